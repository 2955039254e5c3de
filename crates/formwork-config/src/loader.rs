//! # Config Loader
//!
//! Reads a [`Source`] once, validates it against a schema, and freezes the
//! result into an immutable, shareable [`Config`].
//!
//! There is no ambient global: the loaded `Config<C>` is passed explicitly
//! to whatever needs it. [`ConfigLoader`] adds once-only caching for callers
//! that want a lazily initialized handle.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use formwork_schema::{Fields, RawInput, Record, Schema, ValidationErrors};
use parking_lot::Mutex;

use crate::error::ConfigError;
use crate::source::Source;

/// A validated, immutable configuration value shared by reference count.
pub struct Config<C> {
    inner: Arc<C>,
}

impl<C> Config<C> {
    pub fn new(value: C) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    pub fn get(&self) -> &C {
        &self.inner
    }

    /// Whether two handles share the same loaded value.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl<C> Clone for Config<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> Deref for Config<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C: fmt::Debug> fmt::Debug for Config<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Config").field(&*self.inner).finish()
    }
}

/// Read `source` and validate it against `schema`.
///
/// # Errors
///
/// [`ConfigError::Source`] if the source cannot be read,
/// [`ConfigError::Invalid`] with every field error otherwise.
pub fn load_fields<S: Source + ?Sized>(schema: &Schema, source: &S) -> Result<Fields, ConfigError> {
    let (origin, raw) = read(schema, source)?;
    logged(origin, schema.validate(&raw))
}

/// Read `source`, validate it against `C`'s schema, and freeze the result.
pub fn load<C: Record>(source: &(impl Source + ?Sized)) -> Result<Config<C>, ConfigError> {
    let (origin, raw) = read(&C::schema(), source)?;
    logged(origin, C::validate(&raw)).map(Config::new)
}

fn read<S: Source + ?Sized>(schema: &Schema, source: &S) -> Result<(String, RawInput), ConfigError> {
    let origin = source.describe();
    match source.read(schema) {
        Ok(raw) => Ok((origin, raw)),
        Err(cause) => Err(ConfigError::Source { origin, cause }),
    }
}

fn logged<T>(origin: String, result: Result<T, ValidationErrors>) -> Result<T, ConfigError> {
    match result {
        Ok(value) => {
            tracing::info!(source = %origin, "configuration loaded");
            Ok(value)
        }
        Err(errors) => {
            tracing::debug!(source = %origin, errors = errors.len(), "configuration rejected");
            Err(ConfigError::Invalid { origin, errors })
        }
    }
}

/// Loads a configuration on first use and hands out the same value after.
///
/// Only a successful load is cached; after a failure the next call reads
/// the source again. Concurrent first calls are serialized, so the source
/// is read once even under contention.
pub struct ConfigLoader<C, S> {
    source: S,
    cell: OnceLock<Config<C>>,
    gate: Mutex<()>,
}

impl<C: Record, S: Source> ConfigLoader<C, S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cell: OnceLock::new(),
            gate: Mutex::new(()),
        }
    }

    /// The cached configuration, loading it first if needed.
    pub fn load(&self) -> Result<Config<C>, ConfigError> {
        if let Some(config) = self.cell.get() {
            return Ok(config.clone());
        }
        let _guard = self.gate.lock();
        if let Some(config) = self.cell.get() {
            return Ok(config.clone());
        }
        let config = load::<C>(&self.source)?;
        Ok(self.cell.get_or_init(|| config).clone())
    }

    /// The cached configuration, if a load has succeeded.
    pub fn get(&self) -> Option<Config<C>> {
        self.cell.get().cloned()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<C, S: fmt::Debug> fmt::Debug for ConfigLoader<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("source", &self.source)
            .field("loaded", &self.cell.get().is_some())
            .finish()
    }
}
