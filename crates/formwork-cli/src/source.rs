//! # Configuration Source Arguments
//!
//! Every subcommand that loads configuration reads the process environment,
//! optionally layered over a `--config` file.

use std::path::PathBuf;

use clap::Args;
use formwork_config::{ConfigError, EnvSource, FileSource, Layered};

/// Arguments selecting where configuration is read from.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// JSON or YAML file read beneath the environment. Environment variables
    /// override values from the file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Prefix for environment variable names (`APP` reads `APP_PORT`).
    #[arg(long, value_name = "PREFIX")]
    pub env_prefix: Option<String>,
}

impl ConfigArgs {
    /// The layered source these arguments describe.
    pub fn source(&self) -> Layered {
        self.source_with(EnvSource::new())
    }

    /// Same as [`ConfigArgs::source`] with an explicit environment.
    pub fn source_with(&self, env: EnvSource) -> Layered {
        let mut layered = Layered::new();
        if let Some(path) = &self.config {
            layered = layered.with(FileSource::new(path));
        }
        let env = match &self.env_prefix {
            Some(prefix) => env.with_prefix(prefix.as_str()),
            None => env,
        };
        layered.with(env)
    }
}

/// Log every diagnostic of a failed load, one event per problem.
pub fn report(err: &ConfigError) {
    for line in err.diagnostics() {
        tracing::error!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_config::Source;
    use formwork_schema::{field, Schema};
    use std::io::Write;

    #[test]
    fn environment_only_by_default() {
        let source = ConfigArgs::default().source();
        assert_eq!(source.len(), 1);
        assert_eq!(source.describe(), "environment");
    }

    #[test]
    fn file_is_layered_under_environment() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"port: 9000\ndatabaseUrl: postgres://file\n").unwrap();

        let args = ConfigArgs {
            config: Some(file.path().to_path_buf()),
            env_prefix: Some("fw".into()),
        };
        let source = args.source_with(EnvSource::from_vars([("FW_PORT", "9100")]));
        assert_eq!(source.len(), 2);

        let schema = Schema::builder()
            .field("databaseUrl", field::string())
            .field("port", field::number())
            .build();
        let raw = source.read(&schema).unwrap();
        assert_eq!(raw["port"], "9100");
        assert_eq!(raw["databaseUrl"], "postgres://file");
    }
}
