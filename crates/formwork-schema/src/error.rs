//! # Validation Errors
//!
//! Structured, per-field diagnostics produced by the validation engine.
//!
//! Invalid input is never an exceptional path: a failed validation returns
//! [`ValidationErrors`] as an ordinary value, carrying one [`FieldError`] for
//! every field that failed, in schema declaration order.

use serde::Serialize;
use thiserror::Error;

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorReason {
    /// The field is required, has no default, and was absent.
    MissingRequired,
    /// The raw value could not be coerced to the declared kind.
    TypeMismatch,
    /// The coerced value failed one of the field's constraints.
    ConstraintViolation,
}

impl ErrorReason {
    /// Machine-readable code, as used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingRequired => "MISSING_REQUIRED",
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::ConstraintViolation => "CONSTRAINT_VIOLATION",
        }
    }
}

impl std::fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::MissingRequired => "missing required value",
            Self::TypeMismatch => "type mismatch",
            Self::ConstraintViolation => "constraint violated",
        };
        f.write_str(text)
    }
}

/// A single field-level validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{}: {reason}: {detail}", display_path(.path))]
pub struct FieldError {
    /// Dotted path to the field (`range.from`). Empty for the root value.
    pub path: String,
    /// Failure category.
    pub reason: ErrorReason,
    /// Offending raw value, constraint name, or expected kind.
    pub detail: String,
}

impl FieldError {
    /// A required field was absent.
    pub fn missing_required(path: impl Into<String>, expected: &str) -> Self {
        Self {
            path: path.into(),
            reason: ErrorReason::MissingRequired,
            detail: format!("expected {expected}"),
        }
    }

    /// A raw value could not be coerced. `detail` is the raw value.
    pub fn type_mismatch(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: ErrorReason::TypeMismatch,
            detail: detail.into(),
        }
    }

    /// A named constraint rejected the coerced value.
    pub fn constraint_violation(path: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: ErrorReason::ConstraintViolation,
            detail: constraint.into(),
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}

/// Every field error from one validation call, in declaration order.
///
/// Never empty: a validation that produced no errors returns `Ok`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
#[error("{}", render(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        debug_assert!(!errors.is_empty(), "ValidationErrors must not be empty");
        Self { errors }
    }

    /// Append `other`, skipping paths already reported.
    pub(crate) fn merge(mut self, other: ValidationErrors) -> Self {
        for error in other.errors {
            if self.for_path(&error.path).is_none() {
                self.errors.push(error);
            }
        }
        self
    }

    /// Returns the number of field errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false for errors produced by validation.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns a slice of all field errors.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Iterate over the field errors in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    /// Find the first error reported for `path`.
    pub fn for_path(&self, path: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.path == path)
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<FieldError> {
        self.errors
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

fn render(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
