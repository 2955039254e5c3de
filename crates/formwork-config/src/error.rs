//! Error types for configuration loading.

use formwork_schema::ValidationErrors;
use thiserror::Error;

/// A configuration source could not produce raw input.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cannot read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("cannot parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("unsupported config format for {path}: expected .json, .yaml or .yml")]
    UnsupportedFormat { path: String },

    #[error("{path}: top-level value must be a mapping, found {found}")]
    NotAMapping { path: String, found: String },
}

/// Configuration loading failed.
///
/// The loader never terminates the process; the caller decides whether a
/// failure is fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The source itself failed before validation could run.
    #[error("configuration source {origin} failed: {cause}")]
    Source {
        origin: String,
        #[source]
        cause: SourceError,
    },

    /// The source was read but one or more fields are invalid.
    #[error("invalid configuration from {origin}:\n{errors}")]
    Invalid {
        origin: String,
        errors: ValidationErrors,
    },
}

impl ConfigError {
    /// Field errors, when the failure was a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid { errors, .. } => Some(errors),
            Self::Source { .. } => None,
        }
    }

    /// One human-readable line per problem, suitable for logging.
    pub fn diagnostics(&self) -> Vec<String> {
        match self {
            Self::Invalid { errors, .. } => errors.iter().map(ToString::to_string).collect(),
            Self::Source { .. } => vec![self.to_string()],
        }
    }
}
