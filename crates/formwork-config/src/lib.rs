//! # formwork-config: Startup Configuration Loading
//!
//! Validates configuration once, at startup, against a declared
//! [`Record`](formwork_schema::Record) and freezes the result into an
//! immutable [`Config`] that is passed explicitly to the code that needs it.
//!
//! ```ignore
//! let source = Layered::new()
//!     .with(FileSource::new("formwork.yaml"))
//!     .with(EnvSource::new());
//! let config: Config<ApiConfig> = formwork_config::load(&source)?;
//! ```
//!
//! A failed load returns [`ConfigError`] carrying every field error. The
//! library never exits the process; binaries log the diagnostics and abort.

pub mod error;
pub mod loader;
pub mod source;

pub use error::{ConfigError, SourceError};
pub use loader::{load, load_fields, Config, ConfigLoader};
pub use source::{env_key, from_fn, EnvSource, FileSource, FnSource, Layered, Source};
