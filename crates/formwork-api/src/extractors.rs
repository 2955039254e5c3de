//! # Validated Extractors
//!
//! Bridges axum request parsing to schema validation. Query strings and
//! JSON bodies are first parsed into untyped input, then validated against
//! a [`Record`]'s schema; every invalid field is reported in one 422.
//!
//! ```ignore
//! async fn list(ValidatedQuery((page, range)): ValidatedQuery<(Pagination, DateRange)>) { .. }
//! ```

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::Json;
use formwork_schema::{string_input, Record};

use crate::error::AppError;

/// A query string validated against `T`'s schema.
///
/// Undeclared query parameters are ignored. A parameter repeated in the
/// query string keeps its last value.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: Record + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map_err(|err| AppError::BadRequest(err.body_text()))?;
        let value = T::validate(&string_input(params))?;
        Ok(Self(value))
    }
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it against `T`'s schema.
///
/// Malformed JSON is a 400; well-formed JSON that fails validation
/// (including a body that is not an object) is a 422.
pub fn extract_validated_json<T: Record>(
    result: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<T, AppError> {
    let body = extract_json(result)?;
    Ok(T::validate_value(&body)?)
}
