//! # Schema Subcommand
//!
//! Prints the JSON Schema of the application configuration, and optionally
//! the environment variable each field is read from.

use clap::{Args, ValueEnum};
use formwork_api::config::ApiConfig;
use formwork_config::EnvSource;
use formwork_schema::Record;

/// Output encoding for the exported schema.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

/// Arguments for the schema subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// List environment variable names instead of the schema document.
    #[arg(long)]
    pub env: bool,

    /// Prefix for environment variable names, as for `check`.
    #[arg(long, value_name = "PREFIX")]
    pub env_prefix: Option<String>,
}

/// Run `formwork schema`.
pub fn run(args: &SchemaArgs) -> anyhow::Result<()> {
    println!("{}", render(args)?);
    Ok(())
}

/// Render the output `run` prints.
pub fn render(args: &SchemaArgs) -> anyhow::Result<String> {
    if args.env {
        return Ok(env_table(args.env_prefix.as_deref()).join("\n"));
    }

    let doc = ApiConfig::schema().to_json_schema();
    let text = match args.format {
        Format::Json => serde_json::to_string_pretty(&doc)?,
        Format::Yaml => serde_yaml::to_string(&doc)?,
    };
    Ok(text)
}

/// One `VARIABLE  field` line per top-level configuration field.
fn env_table(prefix: Option<&str>) -> Vec<String> {
    let env = match prefix {
        Some(p) => EnvSource::new().with_prefix(p),
        None => EnvSource::new(),
    };
    let schema = ApiConfig::schema();
    schema
        .fields()
        .map(|(name, descriptor)| {
            let rule = if descriptor.is_required() && descriptor.default_value().is_none() {
                "required"
            } else {
                "optional"
            };
            format!("{:<20} {name} ({rule})", env.var_name(name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(format: Format, env: bool) -> SchemaArgs {
        SchemaArgs {
            format,
            env,
            env_prefix: None,
        }
    }

    #[test]
    fn json_output_is_the_config_schema() {
        let text = render(&args(Format::Json, false)).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["properties"]["port"]["type"], "integer");
        assert_eq!(doc["properties"]["port"]["default"], 8080);
        assert_eq!(doc["properties"]["databaseUrl"]["writeOnly"], true);
    }

    #[test]
    fn yaml_output_parses() {
        let text = render(&args(Format::Yaml, false)).unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert!(doc.get("properties").is_some());
    }

    #[test]
    fn env_listing() {
        let text = render(&args(Format::Json, true)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("DATABASE_URL"));
        assert!(lines[0].ends_with("databaseUrl (required)"));
        assert!(lines[2].ends_with("port (optional)"));

        let prefixed = SchemaArgs {
            env_prefix: Some("fw".into()),
            ..args(Format::Json, true)
        };
        assert!(render(&prefixed).unwrap().starts_with("FW_DATABASE_URL"));
    }
}
