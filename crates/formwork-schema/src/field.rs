//! # Field Descriptors
//!
//! A field descriptor is a single typed validation rule: a kind (string,
//! number, date, or nested object), whether the field is required, an
//! optional default, and an ordered list of named constraints.
//!
//! Descriptors are built through the typed [`Field<T>`] builder returned by
//! [`string()`], [`number()`], [`date()`], [`object()`] and [`record()`].
//! The type parameter is the Rust type a successful validation projects
//! to; it is erased when the field is added to a [`Schema`].
//!
//! ## Coercion
//!
//! | Kind   | Accepted raw input                                            |
//! |--------|---------------------------------------------------------------|
//! | string | JSON string                                                   |
//! | number | JSON number, or a string parsed as a finite `f64`             |
//! | date   | RFC 3339 timestamp, or a strict `YYYY-MM-DD` date (UTC midnight) |
//! | object | JSON object, validated against the nested schema              |
//!
//! JSON `null` is treated as absence.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value as Json;

use crate::error::FieldError;
use crate::record::Record;
use crate::schema::Schema;
use crate::value::{as_integer, FieldValue, Fields, Value};

/// Placeholder rendered instead of the raw value of a sensitive field.
pub const REDACTED: &str = "[REDACTED]";

/// The declared kind of a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    String,
    Number,
    Date,
    /// A nested object validated against its own schema.
    Object(Schema),
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
            Self::Object(_) => "object",
        }
    }
}

/// A named predicate over a coerced value.
///
/// The name is reported as the detail of a constraint violation.
#[derive(Clone)]
pub struct Constraint {
    name: String,
    predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Constraint {
    pub fn new(
        name: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Constraint").field(&self.name).finish()
    }
}

/// The type-erased validation rule for one field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    kind: FieldKind,
    required: bool,
    default: Option<Value>,
    constraints: Vec<Constraint>,
    sensitive: bool,
    description: Option<String>,
}

impl FieldDescriptor {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: true,
            default: None,
            constraints: Vec::new(),
            sensitive: false,
            description: None,
        }
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Validate one raw entry.
    ///
    /// Returns `Ok(None)` for an absent optional field with no default.
    /// Nested object fields may return several errors at once.
    pub fn validate(&self, path: &str, raw: Option<&Json>) -> Result<Option<Value>, Vec<FieldError>> {
        let raw = match raw {
            None | Some(Json::Null) => return self.absent(path),
            Some(raw) => raw,
        };

        let value = self.coerce(path, raw)?;

        if let Some(failed) = self.constraints.iter().find(|c| !c.check(&value)) {
            return Err(vec![FieldError::constraint_violation(path, failed.name())]);
        }

        Ok(Some(value))
    }

    fn absent(&self, path: &str) -> Result<Option<Value>, Vec<FieldError>> {
        if let Some(default) = &self.default {
            Ok(Some(default.clone()))
        } else if !self.required {
            Ok(None)
        } else {
            Err(vec![FieldError::missing_required(path, self.kind.name())])
        }
    }

    fn coerce(&self, path: &str, raw: &Json) -> Result<Value, Vec<FieldError>> {
        let coerced = match (&self.kind, raw) {
            (FieldKind::String, Json::String(s)) => Some(Value::String(s.clone())),
            (FieldKind::Number, Json::Number(n)) => n.as_f64().map(Value::Number),
            (FieldKind::Number, Json::String(s)) => parse_number(s).map(Value::Number),
            (FieldKind::Date, Json::String(s)) => parse_date(s).map(Value::Date),
            (FieldKind::Object(schema), Json::Object(map)) => {
                return schema
                    .validate_at(path, map)
                    .map(Value::Record)
                    .map_err(|errors| errors.into_inner());
            }
            _ => None,
        };

        coerced.ok_or_else(|| vec![FieldError::type_mismatch(path, self.render_raw(raw))])
    }

    fn render_raw(&self, raw: &Json) -> String {
        if self.sensitive {
            return REDACTED.to_string();
        }
        match raw {
            Json::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Locale-independent numeric parse. Rejects empty and non-finite input.
fn parse_number(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Strict date parse: RFC 3339 timestamp, or exactly `YYYY-MM-DD`.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    if !bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
    {
        return None;
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

/// A field descriptor tagged with the Rust type it projects to.
pub struct Field<T> {
    descriptor: FieldDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.descriptor).finish()
    }
}

impl<T> From<Field<T>> for FieldDescriptor {
    fn from(field: Field<T>) -> Self {
        field.descriptor
    }
}

impl<T> Field<T> {
    fn of_kind(kind: FieldKind) -> Self {
        Self {
            descriptor: FieldDescriptor::new(kind),
            _marker: PhantomData,
        }
    }

    fn retype<U>(self) -> Field<U> {
        Field {
            descriptor: self.descriptor,
            _marker: PhantomData,
        }
    }

    fn constrain(mut self, constraint: Constraint) -> Self {
        self.descriptor.constraints.push(constraint);
        self
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    /// Attach a human-readable description, emitted in JSON Schema exports.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.descriptor.description = Some(text.into());
        self
    }

    /// Never echo this field's raw value in diagnostics.
    pub fn sensitive(mut self) -> Self {
        self.descriptor.sensitive = true;
        self
    }
}

impl<T: FieldValue + 'static> Field<T> {
    /// Allow the field to be absent. Projects to `Option<T>`.
    pub fn optional(self) -> Field<Option<T>> {
        let mut field: Field<Option<T>> = self.retype();
        field.descriptor.required = false;
        field
    }

    /// Value substituted when the field is absent.
    pub fn default(mut self, value: impl Into<T>) -> Self
    where
        T: Into<Value>,
    {
        self.descriptor.default = Some(value.into().into());
        self
    }

    /// Add a custom constraint over the projected type.
    pub fn check<F>(self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.constrain(Constraint::new(name, move |value| {
            T::from_value(value).is_some_and(|v| predicate(&v))
        }))
    }
}

impl Field<String> {
    /// Minimum length in characters.
    pub fn min_len(self, min: usize) -> Self {
        self.constrain(Constraint::new(format!("min_len({min})"), move |v| {
            v.as_str().is_some_and(|s| s.chars().count() >= min)
        }))
    }

    /// Maximum length in characters.
    pub fn max_len(self, max: usize) -> Self {
        self.constrain(Constraint::new(format!("max_len({max})"), move |v| {
            v.as_str().is_some_and(|s| s.chars().count() <= max)
        }))
    }

    pub fn non_empty(self) -> Self {
        self.constrain(Constraint::new("non_empty", |v| {
            v.as_str().is_some_and(|s| !s.is_empty())
        }))
    }

    /// The value must parse as an absolute URL.
    pub fn url(self) -> Self {
        self.constrain(Constraint::new("url", |v| {
            v.as_str().is_some_and(|s| url::Url::parse(s).is_ok())
        }))
    }

    pub fn one_of(self, options: &[&str]) -> Self {
        let allowed: Vec<String> = options.iter().map(|s| s.to_string()).collect();
        let name = format!("one_of({})", allowed.join("|"));
        self.constrain(Constraint::new(name, move |v| {
            v.as_str().is_some_and(|s| allowed.iter().any(|a| a == s))
        }))
    }
}

impl Field<f64> {
    pub fn min(self, min: f64) -> Self {
        self.constrain(Constraint::new(format!("min({min})"), move |v| {
            v.as_number().is_some_and(|n| n >= min)
        }))
    }

    pub fn max(self, max: f64) -> Self {
        self.constrain(Constraint::new(format!("max({max})"), move |v| {
            v.as_number().is_some_and(|n| n <= max)
        }))
    }

    /// Require an integral value in `i64` range. Projects to `i64`.
    pub fn int(self) -> Field<i64> {
        self.constrain(Constraint::new("int", |v| {
            v.as_number().and_then(as_integer).is_some()
        }))
        .retype()
    }
}

impl Field<i64> {
    pub fn min(self, min: i64) -> Self {
        self.constrain(Constraint::new(format!("min({min})"), move |v| {
            i64::from_value(v).is_some_and(|n| n >= min)
        }))
    }

    pub fn max(self, max: i64) -> Self {
        self.constrain(Constraint::new(format!("max({max})"), move |v| {
            i64::from_value(v).is_some_and(|n| n <= max)
        }))
    }
}

impl Field<DateTime<Utc>> {
    pub fn not_before(self, bound: DateTime<Utc>) -> Self {
        self.constrain(Constraint::new(
            format!("not_before({})", bound.to_rfc3339()),
            move |v| v.as_date().is_some_and(|d| *d >= bound),
        ))
    }

    pub fn not_after(self, bound: DateTime<Utc>) -> Self {
        self.constrain(Constraint::new(
            format!("not_after({})", bound.to_rfc3339()),
            move |v| v.as_date().is_some_and(|d| *d <= bound),
        ))
    }
}

/// A required string field.
pub fn string() -> Field<String> {
    Field::of_kind(FieldKind::String)
}

/// A required number field, projecting to `f64`. See [`Field::int`].
pub fn number() -> Field<f64> {
    Field::of_kind(FieldKind::Number)
}

/// A required date field, projecting to `DateTime<Utc>`.
pub fn date() -> Field<DateTime<Utc>> {
    Field::of_kind(FieldKind::Date)
}

/// A required nested object validated against `schema`.
pub fn object(schema: Schema) -> Field<Fields> {
    Field::of_kind(FieldKind::Object(schema))
}

/// A required nested object validated against a record type's schema.
pub fn record<R: Record>() -> Field<R> {
    Field::of_kind(FieldKind::Object(R::schema()))
}
