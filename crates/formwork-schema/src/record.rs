//! # Record Projection
//!
//! Derives a concrete Rust type from a schema declaration so consuming code
//! gets checked field access without declaring the shape twice.
//!
//! The [`record!`](crate::record!) macro declares a struct and its schema in
//! one place. Each field states its Rust type, its wire key, and the typed
//! field builder that validates it:
//!
//! ```ignore
//! formwork_schema::record! {
//!     #[derive(Debug, Clone)]
//!     pub struct DatabaseConfig {
//!         database_url: String = "databaseUrl" => field::string().url(),
//!         pool_size: i64 = "poolSize" => field::number().int().default(10),
//!         replica_url: Option<String> = "replicaUrl" => field::string().optional(),
//!     }
//! }
//! ```
//!
//! The builder expression is bound to `Field<Type>`, so declaring
//! `replica_url: String` with `field::string().optional()` does not compile.
//! Generated structs have private fields and by-reference accessors.
//!
//! A record value only exists after its own schema accepted the input.
//! Projection consumes a [`Validated`] token that nothing outside this crate
//! can construct, and [`Record::from_fields`] validates foreign [`Fields`]
//! again before projecting them.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};

use crate::error::{FieldError, ValidationErrors};
use crate::schema::{RawInput, Schema};
use crate::value::{FieldValue, Fields, Value};

/// A typed record with a declared schema.
pub trait Record: Sized {
    /// The schema successful validation of this record satisfies.
    fn schema() -> Schema;

    /// Project fields that passed this record's own schema.
    #[doc(hidden)]
    fn from_validated(validated: Validated<Self>) -> Result<Self, ValidationErrors>;

    /// Validate raw input and project the result.
    fn validate(raw: &RawInput) -> Result<Self, ValidationErrors> {
        Self::from_validated(Validated::new(Self::schema().validate(raw)?))
    }

    /// Validate an arbitrary JSON value and project the result.
    fn validate_value(raw: &serde_json::Value) -> Result<Self, ValidationErrors> {
        Self::from_validated(Validated::new(Self::schema().validate_value(raw)?))
    }

    /// Build the record from fields produced by any schema.
    ///
    /// The fields are checked again against this record's schema, so a
    /// value another schema accepted still has to meet every constraint
    /// declared here.
    fn from_fields(fields: &Fields) -> Result<Self, ValidationErrors> {
        Self::validate_value(&fields.to_json())
    }
}

/// Fields accepted by `R`'s own schema.
///
/// Only this crate creates one, right after `R::schema()` validated the
/// input, and projection consumes it.
#[doc(hidden)]
pub struct Validated<R> {
    fields: Fields,
    _record: PhantomData<fn() -> R>,
}

impl<R> Validated<R> {
    fn new(fields: Fields) -> Self {
        Self {
            fields,
            _record: PhantomData,
        }
    }
}

/// Two records validated against the same input.
///
/// Each record is checked against its own schema, so a key both declare
/// must satisfy both descriptors. Errors from the two are reported together;
/// a path the first record already reported is not repeated.
impl<A: Record, B: Record> Record for (A, B) {
    /// Both schemas merged, for export. Validation does not use it.
    fn schema() -> Schema {
        A::schema().merge(&B::schema())
    }

    fn from_validated(validated: Validated<Self>) -> Result<Self, ValidationErrors> {
        Self::from_fields(&validated.fields)
    }

    fn validate(raw: &RawInput) -> Result<Self, ValidationErrors> {
        both(A::validate(raw), B::validate(raw))
    }

    fn validate_value(raw: &serde_json::Value) -> Result<Self, ValidationErrors> {
        both(A::validate_value(raw), B::validate_value(raw))
    }
}

fn both<A, B>(
    a: Result<A, ValidationErrors>,
    b: Result<B, ValidationErrors>,
) -> Result<(A, B), ValidationErrors> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(errors), Ok(_)) | (Ok(_), Err(errors)) => Err(errors),
        (Err(first), Err(second)) => Err(first.merge(second)),
    }
}

/// Mapping from an optional validated value to a record field's type.
///
/// Required fields project from `Some(value)`; `Option<T>` fields accept
/// absence.
pub trait Projected: Sized {
    fn project(value: Option<Value>) -> Option<Self>;
}

macro_rules! impl_projected {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Projected for $ty {
                fn project(value: Option<Value>) -> Option<Self> {
                    value.as_ref().and_then(<$ty as FieldValue>::from_value)
                }
            }
        )*
    };
}

impl_projected!(String, f64, i64, DateTime<Utc>, Fields);

impl<T: FieldValue> Projected for Option<T> {
    fn project(value: Option<Value>) -> Option<Self> {
        match value {
            None => Some(None),
            Some(v) => T::from_value(&v).map(Some),
        }
    }
}

/// Take `key` out of `validated` and project it. Used by [`record!`](crate::record!).
#[doc(hidden)]
pub fn project<T: Projected, R>(validated: &mut Validated<R>, key: &str) -> Result<T, ValidationErrors> {
    let value = validated.fields.take(key);
    let kind = value.as_ref().map_or("absent", Value::kind_name);
    T::project(value).ok_or_else(|| {
        FieldError::type_mismatch(key, format!("{kind} value does not fit the record type")).into()
    })
}

/// Declare a struct together with its schema.
///
/// See the [module documentation](crate::record) for the syntax.
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty = $key:literal => $spec:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $field: $ty, )*
        }

        impl $name {
            $(
                $(#[$field_meta])*
                pub fn $field(&self) -> &$ty {
                    &self.$field
                }
            )*
        }

        impl $crate::Record for $name {
            fn schema() -> $crate::Schema {
                static SCHEMA: ::std::sync::OnceLock<$crate::Schema> = ::std::sync::OnceLock::new();
                SCHEMA
                    .get_or_init(|| {
                        $crate::Schema::builder()
                            $(
                                .field($key, {
                                    let field: $crate::Field<$ty> = $spec;
                                    field
                                })
                            )*
                            .build()
                    })
                    .clone()
            }

            #[allow(unused_mut, unused_variables)]
            fn from_validated(
                mut validated: $crate::record::Validated<Self>,
            ) -> ::std::result::Result<Self, $crate::ValidationErrors> {
                ::std::result::Result::Ok(Self {
                    $( $field: $crate::record::project(&mut validated, $key)?, )*
                })
            }
        }

        impl $crate::FieldValue for $name {
            fn from_value(value: &$crate::Value) -> ::std::option::Option<Self> {
                match value {
                    $crate::Value::Record(fields) => {
                        <Self as $crate::Record>::from_fields(fields).ok()
                    }
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl $crate::Projected for $name {
            fn project(
                value: ::std::option::Option<$crate::Value>,
            ) -> ::std::option::Option<Self> {
                value
                    .as_ref()
                    .and_then(<Self as $crate::FieldValue>::from_value)
            }
        }
    };
}
