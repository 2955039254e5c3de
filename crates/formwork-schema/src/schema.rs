//! # Schema & Validation Engine
//!
//! A [`Schema`] is an ordered mapping of field name to [`FieldDescriptor`].
//! [`Schema::validate`] applies every descriptor to a raw input mapping and
//! either returns the full typed record or every field error at once.
//!
//! ## Semantics
//!
//! - Fields are validated in declaration order, independently of each other.
//! - Validation never stops at the first failure: all field errors are
//!   collected so a caller sees every problem in one report.
//! - Keys present in the raw input but not declared are ignored.
//! - A record is only returned when every field is valid; there is no
//!   partially built result.
//!
//! Schemas are immutable once built and cheap to clone; the field list is
//! shared behind an `Arc`.

use std::sync::Arc;

use serde_json::Value as Json;

use crate::error::{FieldError, ValidationErrors};
use crate::field::FieldDescriptor;
use crate::value::Fields;

/// Untyped input: field name to arbitrary JSON value.
pub type RawInput = serde_json::Map<String, Json>;

/// Build a [`RawInput`] of string values from key/value pairs.
///
/// Environment variables and query strings are string-typed; this is the
/// common way to present them to a schema.
pub fn string_input<I, K, V>(pairs: I) -> RawInput
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), Json::String(v.into())))
        .collect()
}

/// An immutable, ordered set of field descriptors.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Arc<[(String, FieldDescriptor)]>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d)
    }

    /// Iterate over `(name, descriptor)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Declared field names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Combine two schemas. Fields of `other` replace same-named fields of
    /// `self` in place; new fields are appended.
    pub fn merge(&self, other: &Schema) -> Schema {
        Schema::builder().merge(self).merge(other).build()
    }

    /// Validate a raw input mapping.
    ///
    /// # Errors
    ///
    /// Returns every field error, in declaration order, if any field is
    /// missing, cannot be coerced, or violates a constraint.
    pub fn validate(&self, raw: &RawInput) -> Result<Fields, ValidationErrors> {
        self.validate_at("", raw)
    }

    /// Validate an arbitrary JSON value. Anything other than an object is
    /// a single type mismatch at the root.
    pub fn validate_value(&self, raw: &Json) -> Result<Fields, ValidationErrors> {
        match raw {
            Json::Object(map) => self.validate(map),
            other => Err(FieldError::type_mismatch("", other.to_string()).into()),
        }
    }

    pub(crate) fn validate_at(&self, prefix: &str, raw: &RawInput) -> Result<Fields, ValidationErrors> {
        let mut fields = Fields::new();
        let mut errors = Vec::new();

        for (name, descriptor) in self.fields.iter() {
            let path = join_path(prefix, name);
            match descriptor.validate(&path, raw.get(name)) {
                Ok(Some(value)) => fields.push(name.clone(), value),
                Ok(None) => {}
                Err(mut field_errors) => errors.append(&mut field_errors),
            }
        }

        if errors.is_empty() {
            Ok(fields)
        } else {
            Err(ValidationErrors::new(errors))
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Incremental construction of a [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<(String, FieldDescriptor)>,
}

impl SchemaBuilder {
    /// Declare a field. Redeclaring a name replaces the earlier descriptor
    /// but keeps its position.
    pub fn field(mut self, name: impl Into<String>, field: impl Into<FieldDescriptor>) -> Self {
        self.upsert(name.into(), field.into());
        self
    }

    /// Declare every field of `schema`, in its order.
    pub fn merge(mut self, schema: &Schema) -> Self {
        for (name, descriptor) in schema.fields.iter() {
            self.upsert(name.clone(), descriptor.clone());
        }
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            fields: Arc::from(self.fields),
        }
    }

    fn upsert(&mut self, name: String, descriptor: FieldDescriptor) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = descriptor,
            None => self.fields.push((name, descriptor)),
        }
    }
}
