//! # formwork-schema: Declarative Validation for Untyped Input
//!
//! Checks string-keyed input (environment variables, config files, query
//! parameters, JSON bodies) against a declared shape, coerces it into typed
//! values, fills defaults, and returns either a fully typed record or every
//! violation at once.
//!
//! ## Building Blocks
//!
//! - [`field`]: typed field builders ([`field::string`], [`field::number`],
//!   [`field::date`], [`field::record`]) and their constraints.
//! - [`schema`]: [`Schema`] and the aggregating validation engine.
//! - [`record`]: the [`record!`] macro and the [`Record`] trait: a schema
//!   declaration that is also a Rust struct.
//! - [`contracts`]: [`Pagination`] and [`DateRange`], shared by every
//!   list endpoint.
//! - [`json_schema`]: JSON Schema export of a [`Schema`].
//!
//! ## Crate Policy
//!
//! - Validation is pure: no I/O, no global state, no panics on input.
//! - A typed record only exists if its own schema accepted the input.
//!   [`Fields`] has no public constructor, `record!` structs have private
//!   fields, and [`Record::from_fields`] validates again before projecting.
//! - Errors are aggregated. A caller never has to fix one field at a time.

pub mod contracts;
pub mod error;
pub mod field;
pub mod json_schema;
pub mod record;
pub mod schema;
pub mod value;

pub use contracts::{DateRange, Pagination};
pub use error::{ErrorReason, FieldError, ValidationErrors};
pub use field::{Constraint, Field, FieldDescriptor, FieldKind};
pub use record::{Projected, Record};
pub use schema::{string_input, RawInput, Schema, SchemaBuilder};
pub use value::{FieldValue, Fields, Value};
