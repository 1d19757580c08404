//! Integration tests for primary keys and `uniqueOnPks`.

use keycheck::{ArraySchema, ObjectSchema, Schema, SchemaErrors, SchemaLike, ValidationContext};
use serde_json::{json, Value};
use stillwater::Validation;

fn unwrap_failure<T: std::fmt::Debug, E>(v: Validation<T, E>) -> E {
    v.into_result().unwrap_err()
}

/// Only the schema is supplied; `uniqueOnPks` does not need the document.
fn validate_with_schema<S: SchemaLike>(schema: &S, data: &Value) -> Validation<S::Output, SchemaErrors> {
    let context = ValidationContext::new().with_schema(schema);
    schema.validate_in(data, &context)
}

fn basic_schema() -> ArraySchema<ObjectSchema> {
    Schema::array(
        Schema::object()
            .field("key", Schema::string().pk())
            .field("name", Schema::string()),
    )
    .unique_on_pks()
}

fn complex_schema() -> ObjectSchema {
    Schema::object().field(
        "items",
        Schema::array(
            Schema::object().field(
                "otherItems",
                Schema::array(
                    Schema::object()
                        .field("key1", Schema::string().pk())
                        .field("key2", Schema::integer().pk())
                        .field("name", Schema::string()),
                )
                .unique_on_pks(),
            ),
        ),
    )
}

#[test]
fn test_unique_keys_basic_schema() {
    let data = json!([
        {"key": "1", "name": "a"},
        {"key": "2", "name": "a"},
        {"key": "3", "name": "a"},
    ]);
    assert!(validate_with_schema(&basic_schema(), &data).is_success());
}

#[test]
fn test_duplicate_keys_basic_schema() {
    let data = json!([
        {"key": "1", "name": "a"},
        {"key": "2", "name": "b"},
        {"key": "2", "name": "c"},
    ]);
    let errors = unwrap_failure(validate_with_schema(&basic_schema(), &data));

    assert_eq!(errors.len(), 1);
    let error = errors.first();
    assert_eq!(error.code, "duplicateValue");
    assert_eq!(
        error.message,
        r#"There is a duplicate value at path  for keys {"key":"2"}"#
    );
    assert_eq!(error.details.get("keys"), Some(&json!({"key": "2"})));
}

#[test]
fn test_unique_composite_keys() {
    let data = json!({"items": [{"otherItems": [
        {"key1": "a", "key2": 1, "name": "a"},
        {"key1": "a", "key2": 2, "name": "a"},
    ]}]});
    assert!(validate_with_schema(&complex_schema(), &data).is_success());
}

#[test]
fn test_duplicate_composite_keys() {
    let data = json!({"items": [
        {"otherItems": [{"key1": "a", "key2": 1, "name": "a"}]},
        {"otherItems": [
            {"key1": "a", "key2": 1, "name": "a"},
            {"key1": "a", "key2": 1, "name": "b"},
        ]},
    ]});
    let errors = unwrap_failure(validate_with_schema(&complex_schema(), &data));

    assert_eq!(errors.len(), 1);
    let error = errors.first();
    assert_eq!(error.code, "duplicateValue");
    assert_eq!(error.path.to_string(), "items[1].otherItems");
    assert_eq!(
        error.message,
        r#"There is a duplicate value at path items[1].otherItems for keys {"key1":"a","key2":1}"#
    );
}

#[test]
fn test_non_key_fields_do_not_count() {
    let data = json!([
        {"key": "1", "name": "same"},
        {"key": "2", "name": "same"},
    ]);
    assert!(validate_with_schema(&basic_schema(), &data).is_success());

    let reordered = json!([
        {"name": "b", "key": "2"},
        {"name": "a", "key": "1"},
    ]);
    assert!(validate_with_schema(&basic_schema(), &reordered).is_success());
}

#[test]
fn test_absent_key_fields() {
    let schema = Schema::array(Schema::object().optional("key", Schema::string().pk())).unique_on_pks();
    let data = json!([{"key": "1"}, {}]);
    assert!(validate_with_schema(&schema, &data).is_success());

    let data = json!([{}, {}]);
    let errors = unwrap_failure(validate_with_schema(&schema, &data));
    assert_eq!(
        errors.first().message,
        "There is a duplicate value at path  for keys {}"
    );
}

#[test]
fn test_empty_array_passes() {
    assert!(validate_with_schema(&basic_schema(), &json!([])).is_success());
}

#[test]
fn test_no_primary_keys() {
    let schema = Schema::object().field(
        "y",
        Schema::array(Schema::object().field("x", Schema::string())).unique_on_pks(),
    );
    let errors = unwrap_failure(validate_with_schema(&schema, &json!({"y": []})));

    let error = errors.first();
    assert_eq!(error.code, "noPrimaryKeys");
    assert_eq!(error.path.to_string(), "y");
    assert_eq!(error.details.get("path"), Some(&json!("y")));
}

#[test]
fn test_non_object_items_are_a_bad_schema() {
    let schema = Schema::array(Schema::string()).unique_on_pks();
    let errors = unwrap_failure(validate_with_schema(&schema, &json!([])));
    assert_eq!(errors.first().code, "badSchema");
}

#[test]
fn test_missing_schema_in_context() {
    let data = json!([{"key": "1", "name": "a"}]);
    let context = ValidationContext::new().with_data(&data);
    let errors = unwrap_failure(basic_schema().validate_in(&data, &context));
    assert_eq!(errors.first().code, "noContext");
}

#[test]
fn test_duplicates_reported_with_item_errors() {
    let data = json!([
        {"key": "1", "name": "a"},
        {"key": "1"},
    ]);
    let errors = unwrap_failure(validate_with_schema(&basic_schema(), &data));
    let codes: Vec<_> = errors.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["required", "duplicateValue"]);
}

#[test]
fn test_primary_and_foreign_keys_together() {
    let schema = Schema::object()
        .field(
            "makes",
            Schema::array(Schema::object().field("makeId", Schema::string().pk())).unique_on_pks(),
        )
        .field(
            "models",
            Schema::array(
                Schema::object()
                    .field("modelId", Schema::string().pk())
                    .field("makeId", Schema::string().fk("makes.[].makeId")),
            )
            .unique_on_pks(),
        );

    let data = json!({
        "makes": [{"makeId": "ford"}, {"makeId": "ford"}],
        "models": [{"modelId": "laser", "makeId": "holden"}],
    });
    let context = ValidationContext::new().with_data(&data).with_schema(&schema);
    let errors = unwrap_failure(schema.validate_in(&data, &context));

    let codes: Vec<_> = errors.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["duplicateValue", "fkNotFound"]);
}
