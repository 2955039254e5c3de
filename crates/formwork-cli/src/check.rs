//! # Check Subcommand
//!
//! Validates startup configuration without starting anything and prints the
//! resolved values. Sensitive values are redacted.

use clap::Args;
use formwork_api::config::ApiConfig;
use formwork_config::{load_fields, ConfigError, Source};
use formwork_schema::field::REDACTED;
use formwork_schema::{FieldKind, Fields, Record, Schema, Value};

use crate::source::{report, ConfigArgs};

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: ConfigArgs,
}

/// Run `formwork check`.
pub fn run(args: &CheckArgs) -> anyhow::Result<()> {
    match check(&args.source.source()) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            tracing::info!("configuration is valid");
            Ok(())
        }
        Err(err) => {
            report(&err);
            anyhow::bail!("configuration is invalid");
        }
    }
}

/// Validate the application configuration from `source`, returning one
/// `name = value` line per resolved field.
pub fn check(source: &impl Source) -> Result<Vec<String>, ConfigError> {
    let schema = ApiConfig::schema();
    let fields = load_fields(&schema, source)?;
    Ok(summarize(&schema, &fields, ""))
}

/// Render resolved fields, redacting sensitive ones and flattening nested
/// records into dotted names.
pub fn summarize(schema: &Schema, fields: &Fields, prefix: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, value) in fields.iter() {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };
        let descriptor = schema.field(name);
        let sensitive = descriptor.is_some_and(|d| d.is_sensitive());

        match (value, descriptor.map(|d| d.kind())) {
            (Value::Record(nested), Some(FieldKind::Object(inner))) if !sensitive => {
                lines.extend(summarize(inner, nested, &path));
            }
            _ if sensitive => lines.push(format!("{path} = {REDACTED}")),
            _ => lines.push(format!("{path} = {}", render(value))),
        }
    }
    lines
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{s:?}"),
        Value::Date(d) => d.to_rfc3339(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_config::EnvSource;
    use formwork_schema::field;

    #[test]
    fn valid_configuration_is_summarized_with_secrets_hidden() {
        let env = EnvSource::from_vars([("DATABASE_URL", "postgres://app:secret@db/app")]);
        let lines = check(&env).unwrap();
        assert_eq!(
            lines,
            vec![
                format!("databaseUrl = {REDACTED}"),
                "allowedOrigins = \"\"".to_string(),
                "port = 8080".to_string(),
            ]
        );
    }

    #[test]
    fn invalid_configuration_reports_every_problem() {
        let env = EnvSource::from_vars([("DATABASE_URL", "not a url"), ("PORT", "0")]);
        let err = check(&env).unwrap_err();
        assert_eq!(
            err.diagnostics(),
            vec![
                "databaseUrl: constraint violated: url".to_string(),
                "port: constraint violated: min(1)".to_string(),
            ]
        );
    }

    #[test]
    fn nested_records_flatten_to_dotted_names() {
        let inner = Schema::builder()
            .field("host", field::string())
            .field("token", field::string().sensitive())
            .build();
        let schema = Schema::builder()
            .field("upstream", field::object(inner))
            .build();
        let raw = serde_json::from_value(serde_json::json!({
            "upstream": { "host": "h", "token": "t0k" }
        }))
        .unwrap();
        let fields = schema.validate(&raw).unwrap();
        assert_eq!(
            summarize(&schema, &fields, ""),
            vec!["upstream.host = \"h\"".to_string(), format!("upstream.token = {REDACTED}")]
        );
    }
}
