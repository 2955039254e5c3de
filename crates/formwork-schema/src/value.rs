//! # Typed Values
//!
//! [`Value`] is what a raw input entry becomes after coercion, and
//! [`Fields`] is the ordered record of values produced by a successful
//! validation. `Fields` has no public constructor: the only way to obtain
//! one is [`Schema::validate`](crate::Schema::validate).

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A coerced, typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string, passed through unchanged.
    String(String),
    /// A finite number.
    Number(f64),
    /// A UTC instant.
    Date(DateTime<Utc>),
    /// A nested, validated record.
    Record(Fields),
}

impl Value {
    /// Name of the value's kind, matching [`FieldKind::name`](crate::FieldKind::name).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Date(_) => "date",
            Self::Record(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Fields> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Self::Date(d)
    }
}

impl From<Fields> for Value {
    fn from(r: Fields) -> Self {
        Self::Record(r)
    }
}

/// Integral numbers serialize as JSON integers so that `pageSize: 20`
/// does not come back as `20.0`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Number(n) => match as_integer(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Self::Date(d) => d.serialize(serializer),
            Self::Record(r) => r.serialize(serializer),
        }
    }
}

/// Returns `n` as an `i64` when it is integral and in range.
pub(crate) fn as_integer(n: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is out of range.
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

/// Conversion from a coerced [`Value`] to a concrete Rust type.
///
/// Implemented for every type a schema field can project to. Types
/// declared with [`record!`](crate::record) implement it through the macro.
pub trait FieldValue: Sized {
    /// Returns `None` when the value is of a different kind.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FieldValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FieldValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_number()
    }
}

impl FieldValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_number().and_then(as_integer)
    }
}

impl FieldValue for DateTime<Utc> {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_date().copied()
    }
}

impl FieldValue for Fields {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_record().cloned()
    }
}

/// An ordered record of validated values.
///
/// Holds one entry per declared field that has a value; optional fields
/// that were absent and have no default are omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    entries: Vec<(String, Value)>,
}

impl Fields {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, name: String, value: Value) {
        self.entries.push((name, value));
    }

    /// Look up a value by field name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    pub fn get_date(&self, name: &str) -> Option<&DateTime<Utc>> {
        self.get(name).and_then(Value::as_date)
    }

    pub fn get_record(&self, name: &str) -> Option<&Fields> {
        self.get(name).and_then(Value::as_record)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Remove and return a value. Used by record projection.
    pub(crate) fn take(&mut self, name: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Render the record as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        // Value serialization cannot fail: numbers are always finite.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
