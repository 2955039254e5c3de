//! Exported JSON Schema documents must accept what validation produces.

use formwork_schema::{field, string_input, DateRange, Pagination, Record, Schema};
use serde_json::json;

fn settings_schema() -> Schema {
    Schema::builder()
        .field("databaseUrl", field::string().url().sensitive())
        .field("port", field::number().int().min(1).max(65535).default(8080))
        .field("ratio", field::number().optional())
        .field("since", field::date().optional())
        .field("page", field::record::<Pagination>())
        .build()
}

#[test]
fn export_is_a_valid_schema() {
    let doc = settings_schema().to_json_schema();
    assert!(jsonschema::validator_for(&doc).is_ok());
}

#[test]
fn validated_records_conform_to_the_export() {
    let schema = settings_schema();
    let validator = jsonschema::validator_for(&schema.to_json_schema()).unwrap();

    let raw = serde_json::from_value(json!({
        "databaseUrl": "postgres://localhost/app",
        "ratio": "0.25",
        "since": "2026-01-01",
        "page": { "pageSize": "5" }
    }))
    .unwrap();
    let fields = schema.validate(&raw).unwrap();
    assert!(validator.is_valid(&fields.to_json()));
}

#[test]
fn export_rejects_records_missing_defaulted_fields() {
    let validator = jsonschema::validator_for(&Pagination::schema().to_json_schema()).unwrap();
    assert!(!validator.is_valid(&json!({ "pageIndex": 0 })));
    assert!(!validator.is_valid(&json!({ "pageIndex": 0, "pageSize": 2.5 })));
    assert!(validator.is_valid(&json!({ "pageIndex": 0, "pageSize": 20 })));
}

#[test]
fn combined_contracts_export() {
    let schema = <(Pagination, DateRange)>::schema();
    let validator = jsonschema::validator_for(&schema.to_json_schema()).unwrap();
    let fields = schema
        .validate(&string_input([("from", "2026-01-01T08:00:00Z")]))
        .unwrap();
    assert!(validator.is_valid(&fields.to_json()));
    assert_eq!(schema.names(), vec!["pageIndex", "pageSize", "from", "to"]);
}
