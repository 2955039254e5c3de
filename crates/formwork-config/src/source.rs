//! # Configuration Sources
//!
//! A [`Source`] turns some external store into [`RawInput`] for a schema.
//!
//! - [`EnvSource`] reads exactly the variables the schema declares.
//! - [`FileSource`] reads a JSON or YAML document.
//! - [`Layered`] merges several sources, later ones winning.
//! - [`from_fn`] wraps a closure, mostly for tests and embedding.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use formwork_schema::{FieldKind, RawInput, Schema};
use serde_json::Value as Json;

use crate::error::SourceError;

/// Something that can produce raw configuration input.
pub trait Source {
    /// Read raw input for `schema`. Sources that enumerate keys (such as the
    /// environment) use the schema to decide what to read.
    fn read(&self, schema: &Schema) -> Result<RawInput, SourceError>;

    /// Short description for logs and diagnostics.
    fn describe(&self) -> String;
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn read(&self, schema: &Schema) -> Result<RawInput, SourceError> {
        (**self).read(schema)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: Source + ?Sized> Source for &S {
    fn read(&self, schema: &Schema) -> Result<RawInput, SourceError> {
        (**self).read(schema)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Process environment, read through the schema's field names.
///
/// `databaseUrl` is read from `DATABASE_URL`; with prefix `APP` it is read
/// from `APP_DATABASE_URL`. A nested object field `db` with child `poolSize`
/// is read from `DB_POOL_SIZE`. Only declared names are read.
#[derive(Clone)]
pub struct EnvSource {
    prefix: Option<String>,
    lookup: Lookup,
}

impl EnvSource {
    pub fn new() -> Self {
        Self {
            prefix: None,
            lookup: Arc::new(|name| std::env::var(name).ok()),
        }
    }

    /// Prepend `PREFIX_` to every variable name.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(env_key(&prefix.into()));
        self
    }

    /// Replace the variable lookup, e.g. with a fixed map in tests.
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.lookup = Arc::new(lookup);
        self
    }

    /// An environment backed by a fixed set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::new().with_lookup(move |name| vars.get(name).cloned())
    }

    /// The variable name a top-level field is read from.
    pub fn var_name(&self, field: &str) -> String {
        join_key(self.prefix.as_deref(), &env_key(field))
    }

    fn read_schema(&self, schema: &Schema, prefix: Option<&str>) -> RawInput {
        let mut raw = RawInput::new();
        for (name, descriptor) in schema.fields() {
            let key = join_key(prefix, &env_key(name));
            match descriptor.kind() {
                FieldKind::Object(nested) => {
                    let inner = self.read_schema(nested, Some(&key));
                    if !inner.is_empty() {
                        raw.insert(name.to_string(), Json::Object(inner));
                    }
                }
                _ => {
                    if let Some(value) = (self.lookup)(&key) {
                        raw.insert(name.to_string(), Json::String(value));
                    }
                }
            }
        }
        raw
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSource")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl Source for EnvSource {
    fn read(&self, schema: &Schema) -> Result<RawInput, SourceError> {
        Ok(self.read_schema(schema, self.prefix.as_deref()))
    }

    fn describe(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("environment ({prefix}_*)"),
            None => "environment".to_string(),
        }
    }
}

fn join_key(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}_{key}"),
        _ => key.to_string(),
    }
}

/// Map a field name to its environment variable name.
///
/// camelCase word boundaries become underscores and letters are uppercased:
/// `databaseUrl` → `DATABASE_URL`, `tlsCAPath` → `TLS_CA_PATH`. Any other
/// non-alphanumeric character becomes `_`.
pub fn env_key(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push('_');
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// A JSON (`.json`) or YAML (`.yaml`, `.yml`) document whose top level is a
/// mapping keyed by field name.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for FileSource {
    fn read(&self, _schema: &Schema) -> Result<RawInput, SourceError> {
        let path = self.path.display().to_string();
        let content = std::fs::read_to_string(&self.path).map_err(|e| SourceError::Read {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        let value = match ext {
            "yaml" | "yml" => {
                let yaml: serde_yaml::Value =
                    serde_yaml::from_str(&content).map_err(|e| SourceError::Parse {
                        path: path.clone(),
                        reason: e.to_string(),
                    })?;
                yaml_to_json_value(&yaml).map_err(|reason| SourceError::Parse {
                    path: path.clone(),
                    reason,
                })?
            }
            "json" => serde_json::from_str(&content).map_err(|e| SourceError::Parse {
                path: path.clone(),
                reason: e.to_string(),
            })?,
            _ => return Err(SourceError::UnsupportedFormat { path }),
        };

        match value {
            Json::Object(map) => Ok(map),
            // An empty YAML document.
            Json::Null => Ok(RawInput::new()),
            other => Err(SourceError::NotAMapping {
                path,
                found: json_kind(&other).to_string(),
            }),
        }
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "sequence",
        Json::Object(_) => "mapping",
    }
}

/// Convert a YAML value into the equivalent JSON value.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Json, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Json::Null),
        serde_yaml::Value::Bool(b) => Ok(Json::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Json::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Json::Number(u.into()))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Json::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Json::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                out.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Json::Object(out))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

// ---------------------------------------------------------------------------
// Layering
// ---------------------------------------------------------------------------

/// Several sources merged in order. Later sources override earlier ones key
/// by key; nested objects merge recursively. `null` never overrides.
#[derive(Default)]
pub struct Layered {
    layers: Vec<Box<dyn Source + Send + Sync>>,
}

impl Layered {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer above every layer added so far.
    pub fn with(mut self, source: impl Source + Send + Sync + 'static) -> Self {
        self.layers.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl fmt::Debug for Layered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Layered").field(&self.describe()).finish()
    }
}

impl Source for Layered {
    fn read(&self, schema: &Schema) -> Result<RawInput, SourceError> {
        let mut merged = RawInput::new();
        for layer in &self.layers {
            deep_merge(&mut merged, layer.read(schema)?);
        }
        Ok(merged)
    }

    fn describe(&self) -> String {
        if self.layers.is_empty() {
            return "no sources".to_string();
        }
        self.layers
            .iter()
            .map(|l| l.describe())
            .collect::<Vec<_>>()
            .join(" < ")
    }
}

fn deep_merge(base: &mut RawInput, overlay: RawInput) {
    for (key, value) in overlay {
        match value {
            Json::Null => {}
            Json::Object(incoming) => {
                if let Some(Json::Object(existing)) = base.get_mut(&key) {
                    deep_merge(existing, incoming);
                } else {
                    base.insert(key, Json::Object(incoming));
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Closures
// ---------------------------------------------------------------------------

/// A source backed by a closure. See [`from_fn`].
pub struct FnSource<F> {
    read: F,
}

/// Wrap a closure producing raw input as a [`Source`].
pub fn from_fn<F>(read: F) -> FnSource<F>
where
    F: Fn() -> RawInput,
{
    FnSource { read }
}

impl<F: Fn() -> RawInput> Source for FnSource<F> {
    fn read(&self, _schema: &Schema) -> Result<RawInput, SourceError> {
        Ok((self.read)())
    }

    fn describe(&self) -> String {
        "inline".to_string()
    }
}

impl<F> fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSource")
    }
}
