//! # formwork-cli: Command-Line Interface
//!
//! ## Subcommands
//!
//! - `check`: validate startup configuration and print the resolved values
//! - `schema`: print the configuration's JSON Schema
//! - `serve`: validate configuration, then run the HTTP API
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers in each module.
//! - This is the only place that decides a configuration failure is fatal.
//!   Libraries return errors; handlers log every diagnostic and fail.

pub mod check;
pub mod schema;
pub mod serve;
pub mod source;
