//! # JSON Schema Export
//!
//! Describes the shape of a *validated* record as a Draft 2020-12 JSON
//! Schema document. Raw input is looser than this (numbers may arrive as
//! strings, dates as calendar dates); the export documents what
//! [`Fields`](crate::Fields) serializes to after a successful validation.
//!
//! - Fields with a default are listed as `required`: a validated record
//!   always carries them.
//! - Undeclared keys are ignored by validation, so objects allow
//!   `additionalProperties`.

use serde_json::{json, Map, Value as Json};

use crate::field::{FieldDescriptor, FieldKind};
use crate::schema::Schema;

const DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

impl Schema {
    /// Render the schema as a standalone JSON Schema document.
    pub fn to_json_schema(&self) -> Json {
        let mut doc = Map::new();
        doc.insert("$schema".into(), Json::String(DRAFT.into()));
        doc.extend(object_schema(self));
        Json::Object(doc)
    }
}

fn object_schema(schema: &Schema) -> Map<String, Json> {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for (name, descriptor) in schema.fields() {
        properties.insert(name.to_string(), Json::Object(field_schema(descriptor)));
        if descriptor.is_required() || descriptor.default_value().is_some() {
            required.push(Json::String(name.to_string()));
        }
    }

    let mut out = Map::new();
    out.insert("type".into(), json!("object"));
    out.insert("properties".into(), Json::Object(properties));
    out.insert("required".into(), Json::Array(required));
    out.insert("additionalProperties".into(), Json::Bool(true));
    out
}

fn field_schema(descriptor: &FieldDescriptor) -> Map<String, Json> {
    let mut out = match descriptor.kind() {
        FieldKind::String => type_only("string"),
        FieldKind::Number if is_integer(descriptor) => type_only("integer"),
        FieldKind::Number => type_only("number"),
        FieldKind::Date => {
            let mut m = type_only("string");
            m.insert("format".into(), json!("date-time"));
            m
        }
        FieldKind::Object(nested) => object_schema(nested),
    };

    if let Some(default) = descriptor.default_value() {
        if let Ok(value) = serde_json::to_value(default) {
            out.insert("default".into(), value);
        }
    }
    if let Some(text) = descriptor.description() {
        out.insert("description".into(), Json::String(text.to_string()));
    }
    if descriptor.is_sensitive() {
        out.insert("writeOnly".into(), Json::Bool(true));
    }
    out
}

fn type_only(name: &str) -> Map<String, Json> {
    let mut m = Map::new();
    m.insert("type".into(), Json::String(name.into()));
    m
}

fn is_integer(descriptor: &FieldDescriptor) -> bool {
    descriptor.constraints().iter().any(|c| c.name() == "int")
}
