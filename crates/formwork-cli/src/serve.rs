//! # Serve Subcommand
//!
//! Loads and validates configuration, then runs the HTTP API. The server
//! never starts with invalid configuration.

use std::net::SocketAddr;

use clap::Args;
use formwork_api::config::ApiConfig;
use formwork_api::state::AppState;
use formwork_config::{from_fn, Config, EnvSource, Layered};
use formwork_schema::string_input;

use crate::source::{report, ConfigArgs};

/// Arguments for the serve subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub source: ConfigArgs,

    /// Override the configured listen port. Validated like `PORT`.
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// The configured source, with `--port` layered on top when given.
    pub fn source_with(&self, env: EnvSource) -> Layered {
        let layered = self.source.source_with(env);
        match self.port {
            Some(port) => layered.with(from_fn(move || string_input([("port", port.to_string())]))),
            None => layered,
        }
    }
}

/// Run `formwork serve`.
pub fn run(args: &ServeArgs) -> anyhow::Result<()> {
    let config = match formwork_config::load::<ApiConfig>(&args.source_with(EnvSource::new())) {
        Ok(config) => config,
        Err(err) => {
            report(&err);
            anyhow::bail!("refusing to start with invalid configuration");
        }
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(config))
}

async fn serve(config: Config<ApiConfig>) -> anyhow::Result<()> {
    let port = config.listen_port();
    let origins = config.origins().len();
    let app = formwork_api::app(AppState::new(config));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, cors_origins = origins, "formwork API listening");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_schema::ErrorReason;

    fn args(port: Option<u16>) -> ServeArgs {
        ServeArgs {
            source: ConfigArgs::default(),
            port,
        }
    }

    fn env() -> EnvSource {
        EnvSource::from_vars([("DATABASE_URL", "postgres://db"), ("PORT", "9000")])
    }

    #[test]
    fn port_flag_overrides_environment() {
        let config = formwork_config::load::<ApiConfig>(&args(Some(9100)).source_with(env())).unwrap();
        assert_eq!(config.listen_port(), 9100);
    }

    #[test]
    fn environment_port_used_without_flag() {
        let config = formwork_config::load::<ApiConfig>(&args(None).source_with(env())).unwrap();
        assert_eq!(config.listen_port(), 9000);
    }

    #[test]
    fn port_flag_zero_is_rejected() {
        let err = formwork_config::load::<ApiConfig>(&args(Some(0)).source_with(env())).unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].path, "port");
        assert_eq!(errors.errors()[0].reason, ErrorReason::ConstraintViolation);
    }
}
