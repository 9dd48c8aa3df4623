//! Validating records decoded from JSON payloads.

use pretty_assertions::assert_eq;
use serde_json::json;
use sieve_validator::prelude::*;
use sieve_validator::value::record_from_json;

fn order_schema() -> Schema {
    Schema::new().shape(shape! {
        "id" => uuid().version(4).required(),
        "customer" => object()
            .field("name", text().trim().required())
            .field("email", email().trim().lowercase().required()),
        "items" => array()
            .min(1)
            .of(object()
                .field("sku", text().trim().uppercase().regex(r"^[A-Z]{3}-\d{3}$").required())
                .field("qty", number().integer().positive().required())),
        "placed_at" => date().layout("%Y-%m-%dT%H:%M:%S"),
        "gift" => boolean().default_value(false),
    })
}

#[test]
fn valid_payload_is_cleaned() {
    let data = record_from_json(json!({
        "id": "550e8400-e29b-41d4-a716-446655440000",
        "customer": { "name": "  Ada  ", "email": " ADA@Example.COM " },
        "items": [{ "sku": " abc-123 ", "qty": 2 }],
        "placed_at": "2024-03-01T10:30:00",
    }))
    .unwrap();

    let result = order_schema().validate(&data);
    assert!(!result.has_errors(), "{result}");

    let cleaned = serde_json::to_value(result.valid_data().unwrap()).unwrap();
    assert_eq!(cleaned["customer"]["email"], json!("ada@example.com"));
    assert_eq!(cleaned["items"][0]["sku"], json!("ABC-123"));
    assert_eq!(cleaned["gift"], json!(false));
}

#[test]
fn invalid_payload_reports_every_path() {
    let data = record_from_json(json!({
        "id": "not-a-uuid",
        "customer": { "name": null, "email": "nope" },
        "items": [
            { "sku": "abc-123", "qty": 1 },
            { "sku": "bad", "qty": -3 },
        ],
        "gift": "yes",
    }))
    .unwrap();

    let result = order_schema().validate(&data);
    let paths: Vec<&str> = result.errors().keys().map(String::as_str).collect();
    assert_eq!(
        paths,
        [
            "id",
            "customer.name",
            "customer.email",
            "items[1].sku",
            "items[1].qty",
            "gift",
        ]
    );
    assert_eq!(result.field_errors("gift"), ["gift must be a boolean value"]);
    assert_eq!(result.field_errors("items[1].qty"), ["items[1].qty must be positive"]);
}

#[test]
fn wrong_container_types() {
    let data = record_from_json(json!({
        "id": "550e8400-e29b-41d4-a716-446655440000",
        "customer": "Ada",
        "items": { "sku": "ABC-123" },
    }))
    .unwrap();

    let result = order_schema().validate(&data);
    assert_eq!(
        result.field_errors("customer")[0],
        "Transformation error: expected object, got string"
    );
    assert_eq!(
        result.field_errors("items")[0],
        "Transformation error: expected array, got object"
    );
}

#[test]
fn non_object_json_is_not_a_record() {
    assert!(record_from_json(json!([1, 2, 3])).is_none());
    assert!(record_from_json(json!("text")).is_none());
}

#[test]
fn errors_serialize_for_api_responses() {
    let schema = Schema::new().field("name", text().required());
    let result = schema.validate(&Record::new());
    let body = serde_json::to_value(result.errors()).unwrap();
    assert_eq!(body, json!({ "name": ["name is required"] }));
}
