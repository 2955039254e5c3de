//! # Application Configuration
//!
//! Startup configuration for the API service, declared as a record so the
//! same declaration drives environment loading, validation, and the
//! `formwork schema` export.
//!
//! | Field            | Variable          | Rule                              |
//! |------------------|-------------------|-----------------------------------|
//! | `databaseUrl`    | `DATABASE_URL`    | required, URL, sensitive          |
//! | `allowedOrigins` | `ALLOWED_ORIGINS` | comma-separated, default empty    |
//! | `port`           | `PORT`            | integer 1..=65535, default 8080   |

use std::fmt;

use formwork_schema::field;
use formwork_schema::field::REDACTED;

formwork_schema::record! {
    #[derive(Clone)]
    pub struct ApiConfig {
        /// Database connection string.
        database_url: String = "databaseUrl" => field::string()
            .url()
            .sensitive()
            .describe("Database connection URL"),
        /// Raw comma-separated CORS origin list. See [`ApiConfig::origins`].
        allowed_origins: String = "allowedOrigins" => field::string()
            .default("")
            .describe("Comma-separated list of origins allowed to make cross-origin requests"),
        /// Listen port.
        port: i64 = "port" => field::number()
            .int()
            .min(1)
            .max(65535)
            .default(8080)
            .describe("TCP port the HTTP server listens on"),
    }
}

impl ApiConfig {
    /// Allowed CORS origins, trimmed, with empty entries dropped.
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The listen port as a socket port number.
    pub fn listen_port(&self) -> u16 {
        // Validation bounds the port to 1..=65535.
        u16::try_from(self.port).unwrap_or(8080)
    }
}

/// Redacts the database URL, which usually embeds credentials.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("database_url", &REDACTED)
            .field("allowed_origins", &self.allowed_origins)
            .field("port", &self.port)
            .finish()
    }
}
