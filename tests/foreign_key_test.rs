//! Integration tests for foreign-key rules.

use keycheck::{
    ErrorTier, FkOptions, ObjectSchema, Schema, SchemaErrors, SchemaLike, ValidationContext,
};
use serde_json::{json, Value};
use stillwater::Validation;

fn unwrap_failure<T: std::fmt::Debug, E>(v: Validation<T, E>) -> E {
    v.into_result().unwrap_err()
}

fn validate_document<S: SchemaLike>(schema: &S, data: &Value) -> Validation<S::Output, SchemaErrors> {
    let context = ValidationContext::new().with_data(data).with_schema(schema);
    schema.validate_in(data, &context)
}

fn single_part_schema() -> ObjectSchema {
    Schema::object()
        .field(
            "makes",
            Schema::array(
                Schema::object()
                    .field("makeId", Schema::string())
                    .field("name", Schema::string()),
            ),
        )
        .field(
            "models",
            Schema::array(
                Schema::object()
                    .field("modelId", Schema::string())
                    .field("name", Schema::string())
                    .field("makeId", Schema::string().fk("makes.[].makeId")),
            ),
        )
}

fn makes() -> Value {
    json!([
        {"makeId": "ford", "name": "Ford"},
        {"makeId": "mazda", "name": "Mazda"},
    ])
}

fn models() -> Value {
    json!([
        {"modelId": "laser", "name": "Laser", "makeId": "ford"},
        {"modelId": "familia", "name": "Familia", "makeId": "mazda"},
    ])
}

fn makes_with_models() -> Value {
    json!([
        {"makeId": "ford", "name": "Ford", "models": [{"modelId": "laser", "name": "Laser"}]},
        {"makeId": "mazda", "name": "Mazda", "models": [{"modelId": "familia", "name": "Familia"}]},
    ])
}

fn make_with_models_schema() -> ObjectSchema {
    Schema::object()
        .field("makeId", Schema::string())
        .field("name", Schema::string())
        .field(
            "models",
            Schema::array(
                Schema::object()
                    .field("modelId", Schema::string())
                    .field("name", Schema::string()),
            ),
        )
}

fn parent_fk_schema() -> ObjectSchema {
    Schema::object()
        .field("makes", Schema::array(make_with_models_schema()))
        .field(
            "vehicles",
            Schema::array(
                Schema::object()
                    .field("chassisNumber", Schema::string())
                    .field("makeId", Schema::string().fk("makes.[].makeId"))
                    .field(
                        "modelId",
                        Schema::string().fk_with(
                            "makes.[].models.[].modelId",
                            FkOptions::new().parent_field_name("makeId"),
                        ),
                    ),
            ),
        )
}

fn vehicle_schema_with_parent_path() -> ObjectSchema {
    Schema::object()
        .field("chassisNumber", Schema::string())
        .field("makeId", Schema::string().fk("makes.[].makeId"))
        .field(
            "modelId",
            Schema::string().fk_with(
                "makes.[].models.[].modelId",
                FkOptions::new().parent_field_path("vehicles.[].makeId"),
            ),
        )
}

#[test]
fn test_single_part_fk_passes() {
    let data = json!({"makes": makes(), "models": models()});
    assert!(validate_document(&single_part_schema(), &data).is_success());
}

#[test]
fn test_single_part_fk_fails() {
    let data = json!({
        "makes": makes(),
        "models": [{"modelId": "laser", "name": "Laser", "makeId": "nissan"}],
    });
    let errors = unwrap_failure(validate_document(&single_part_schema(), &data));

    assert_eq!(errors.len(), 1);
    let error = errors.first();
    assert_eq!(error.code, "fkNotFound");
    assert_eq!(
        error.message,
        r#""nissan" could not be found as a reference to "makes.[].makeId""#
    );
    assert_eq!(error.path.to_string(), "models[0].makeId");
    assert_eq!(error.got.as_deref(), Some("nissan"));
    assert_eq!(error.details.get("path"), Some(&json!("makes.[].makeId")));
}

#[test]
fn test_every_bad_reference_is_reported() {
    let data = json!({
        "makes": makes(),
        "models": [
            {"modelId": "skyline", "name": "Skyline", "makeId": "nissan"},
            {"modelId": "laser", "name": "Laser", "makeId": "ford"},
            {"modelId": "corolla", "name": "Corolla", "makeId": "toyota"},
        ],
    });
    let errors = unwrap_failure(validate_document(&single_part_schema(), &data));
    let paths: Vec<_> = errors.iter().map(|e| e.path.to_string()).collect();
    assert_eq!(paths, vec!["models[0].makeId", "models[2].makeId"]);
}

#[test]
fn test_missing_context_is_a_configuration_error() {
    let data = json!({"makes": makes(), "models": models()});
    let schema = single_part_schema();
    let errors = unwrap_failure(schema.validate_in(&data, &ValidationContext::new()));

    assert_eq!(errors.first().code, "noContextData");
    assert_eq!(errors.len(), 2);
}

#[test]
fn test_missing_schema_in_context() {
    let data = json!({"makes": makes(), "models": models()});
    let schema = single_part_schema();
    let context = ValidationContext::new().with_data(&data);
    let errors = unwrap_failure(schema.validate_in(&data, &context));
    assert_eq!(errors.first().code, "noContextSchema");
}

#[test]
fn test_two_part_parent_fk_passes() {
    let data = json!({
        "makes": makes_with_models(),
        "vehicles": [{"chassisNumber": "1234", "makeId": "mazda", "modelId": "familia"}],
    });
    assert!(validate_document(&parent_fk_schema(), &data).is_success());
}

#[test]
fn test_two_part_parent_fk_fails_for_model_of_another_make() {
    // laser exists, but under ford
    let data = json!({
        "makes": makes_with_models(),
        "vehicles": [{"chassisNumber": "1234", "makeId": "mazda", "modelId": "laser"}],
    });
    let errors = unwrap_failure(validate_document(&parent_fk_schema(), &data));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().code, "fkNotFound");
    assert_eq!(errors.first().path.to_string(), "vehicles[0].modelId");
}

#[test]
fn test_two_part_fk_with_unknown_parent_make() {
    let data = json!({
        "makes": makes_with_models(),
        "vehicles": [{"chassisNumber": "1234", "makeId": "nissan", "modelId": "laser"}],
    });
    let errors = unwrap_failure(validate_document(&parent_fk_schema(), &data));
    let codes: Vec<_> = errors.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["fkNotFound", "fkNotFound"]);
}

#[test]
fn test_parent_field_path_when_validating_at_the_child() {
    let vehicle = vehicle_schema_with_parent_path();
    let full = Schema::object()
        .field("makes", Schema::array(make_with_models_schema()))
        .field("vehicles", Schema::array(vehicle_schema_with_parent_path()));

    let data = json!({
        "makes": makes_with_models(),
        "vehicles": [{"chassisNumber": "1234", "makeId": "mazda", "modelId": "familia"}],
    });
    let context = ValidationContext::new().with_data(&data).with_schema(&full);
    assert!(vehicle.validate_in(&data["vehicles"][0], &context).is_success());
}

#[test]
fn test_parent_field_path_when_validating_at_the_child_fails() {
    let vehicle = vehicle_schema_with_parent_path();
    let full = Schema::object()
        .field("makes", Schema::array(make_with_models_schema()))
        .field("vehicles", Schema::array(vehicle_schema_with_parent_path()));

    let data = json!({
        "makes": makes_with_models(),
        "vehicles": [{"chassisNumber": "1234", "makeId": "mazda", "modelId": "laser"}],
    });
    let context = ValidationContext::new().with_data(&data).with_schema(&full);
    let errors = unwrap_failure(vehicle.validate_in(&data["vehicles"][0], &context));
    assert_eq!(errors.first().code, "fkNotFound");
    assert_eq!(errors.first().path.to_string(), "modelId");
}

#[test]
fn test_parent_field_name_differs_from_lookup_field() {
    let schema = Schema::array(
        Schema::object()
            .field("parentId", Schema::string())
            .field(
                "children",
                Schema::array(
                    Schema::object()
                        .field("childId", Schema::string())
                        .optional("friendParentId", Schema::string().fk("[].parentId"))
                        .optional(
                            "friendChildId",
                            Schema::string().fk_with(
                                "[].children.[].childId",
                                FkOptions::new().parent_field_name("friendParentId"),
                            ),
                        ),
                ),
            ),
    );

    let good = json!([
        {"parentId": "bob", "children": [{"childId": "sam"}]},
        {"parentId": "mary", "children": [
            {"childId": "kelly", "friendParentId": "bob", "friendChildId": "sam"},
        ]},
    ]);
    assert!(validate_document(&schema, &good).is_success());

    // kelly is mary's own child, not bob's
    let bad = json!([
        {"parentId": "bob", "children": [{"childId": "sam"}]},
        {"parentId": "mary", "children": [
            {"childId": "kelly", "friendParentId": "bob", "friendChildId": "kelly"},
        ]},
    ]);
    let errors = unwrap_failure(validate_document(&schema, &bad));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().path.to_string(), "[1].children[0].friendChildId");
}

#[test]
fn test_zero_is_a_valid_lookup_key() {
    let schema = Schema::object().field(
        "people",
        Schema::array(
            Schema::object()
                .field("personId", Schema::integer())
                .optional("parentPersonId", Schema::integer().fk("people.[].personId")),
        ),
    );

    let data = json!({"people": [{"personId": 0}, {"personId": 1, "parentPersonId": 0}]});
    assert!(validate_document(&schema, &data).is_success());

    let data = json!({"people": [{"personId": 0}, {"personId": 1, "parentPersonId": 2}]});
    let errors = unwrap_failure(validate_document(&schema, &data));
    assert_eq!(
        errors.first().message,
        r#""2" could not be found as a reference to "people.[].personId""#
    );
}

#[test]
fn test_two_wildcards_without_parent_option() {
    let schema = Schema::object()
        .field("makes", Schema::array(make_with_models_schema()))
        .field(
            "vehicles",
            Schema::array(
                Schema::object().field("modelId", Schema::string().fk("makes.[].models.[].modelId")),
            ),
        );
    let data = json!({"makes": makes_with_models(), "vehicles": [{"modelId": "laser"}]});
    let errors = unwrap_failure(validate_document(&schema, &data));

    let error = errors.first();
    assert_eq!(error.code, "twoArrays");
    assert_eq!(
        error.message,
        r#""makes.[].models.[].modelId" contains two or more array elements, but no parent field option is supplied"#
    );
}

#[test]
fn test_three_wildcards_are_rejected() {
    let schema = Schema::object().field(
        "ref",
        Schema::string().fk_with("a.[].b.[].c.[].d", FkOptions::new().parent_field_name("x")),
    );
    let data = json!({"ref": "d1"});
    let errors = unwrap_failure(validate_document(&schema, &data));
    assert_eq!(errors.first().code, "threeArrays");
}

#[test]
fn test_parent_field_without_fk_rule() {
    let schema = Schema::object()
        .field("makes", Schema::array(make_with_models_schema()))
        .field(
            "vehicles",
            Schema::array(
                Schema::object()
                    .field("chassisNumber", Schema::string())
                    .field(
                        "modelId",
                        Schema::string().fk_with(
                            "makes.[].models.[].modelId",
                            FkOptions::new().parent_field_name("chassisNumber"),
                        ),
                    ),
            ),
        );
    let data = json!({
        "makes": makes_with_models(),
        "vehicles": [{"chassisNumber": "1234", "modelId": "laser"}],
    });
    let errors = unwrap_failure(validate_document(&schema, &data));
    let error = errors.first();
    assert_eq!(error.code, "parentFieldNotFound");
    assert_eq!(error.details.get("parentField"), Some(&json!("chassisNumber")));
}

#[test]
fn test_fk_reference_into_nested_object() {
    let schema = Schema::object()
        .field(
            "catalog",
            Schema::object().field(
                "makes",
                Schema::array(Schema::object().field("makeId", Schema::string())),
            ),
        )
        .field("preferredMake", Schema::string().fk("catalog.makes.[].makeId"));

    let data = json!({"catalog": {"makes": [{"makeId": "ford"}]}, "preferredMake": "ford"});
    assert!(validate_document(&schema, &data).is_success());

    let data = json!({"catalog": {"makes": [{"makeId": "ford"}]}, "preferredMake": "audi"});
    assert!(validate_document(&schema, &data).is_failure());
}

#[test]
fn test_tiers_of_reported_codes() {
    let data = json!({"makes": makes(), "models": [{"modelId": "x", "name": "X", "makeId": "nissan"}]});
    let errors = unwrap_failure(validate_document(&single_part_schema(), &data));
    assert_eq!(errors.first().code, "fkNotFound");

    let data_error = keycheck::IntegrityError::FkNotFound {
        value: json!("nissan"),
        path: "makes.[].makeId".to_string(),
    };
    assert_eq!(data_error.tier(), ErrorTier::Data);
    assert_eq!(keycheck::IntegrityError::NoContextData.tier(), ErrorTier::Configuration);
}

#[test]
fn test_only_the_dangling_model_fails() {
    let schema = Schema::object()
        .field("makes", Schema::array(Schema::object().field("makeId", Schema::string())))
        .field(
            "models",
            Schema::array(Schema::object().field("makeId", Schema::string().fk("makes.[].makeId"))),
        );
    let data = json!({
        "makes": [{"makeId": "ford"}, {"makeId": "mazda"}],
        "models": [{"makeId": "ford"}, {"makeId": "nissan"}],
    });
    let errors = unwrap_failure(validate_document(&schema, &data));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().path.to_string(), "models[1].makeId");
    assert_eq!(errors.first().details.get("value"), Some(&json!("nissan")));
}

fn rates_schema() -> ObjectSchema {
    Schema::object()
        .field(
            "rates",
            Schema::array(Schema::object().field("rate", Schema::number().pk())).unique_on_pks(),
        )
        .field(
            "loans",
            Schema::array(Schema::object().field("rate", Schema::number().fk("rates.[].rate"))),
        )
}

#[test]
fn test_decimal_keys() {
    let data = json!({"rates": [{"rate": 1.5}, {"rate": 2.25}], "loans": [{"rate": 1.5}]});
    assert!(validate_document(&rates_schema(), &data).is_success());

    let data = json!({"rates": [{"rate": 1.5}], "loans": [{"rate": 1.5}, {"rate": 1.75}]});
    let errors = unwrap_failure(validate_document(&rates_schema(), &data));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().code, "fkNotFound");
    assert_eq!(errors.first().path.to_string(), "loans[1].rate");
}

#[test]
fn test_duplicate_decimal_primary_key() {
    let data = json!({"rates": [{"rate": 1.5}, {"rate": 1.5}], "loans": []});
    let errors = unwrap_failure(validate_document(&rates_schema(), &data));
    assert_eq!(
        errors.first().message,
        r#"There is a duplicate value at path rates for keys {"rate":1.5}"#
    );
}

#[test]
fn test_date_keys() {
    let schema = Schema::object()
        .field(
            "holidays",
            Schema::array(Schema::object().field("day", Schema::date().pk())).unique_on_pks(),
        )
        .field(
            "closures",
            Schema::array(Schema::object().field("day", Schema::date().fk("holidays.[].day"))),
        );

    let data = json!({
        "holidays": [{"day": "2021-12-25"}, {"day": "2022-01-01"}],
        "closures": [{"day": "2021-12-25"}],
    });
    assert!(validate_document(&schema, &data).is_success());

    // same instant, written differently
    let data = json!({
        "holidays": [{"day": "2021-12-25"}],
        "closures": [{"day": "2021-12-25T00:00:00Z"}, {"day": "someday"}],
    });
    let errors = unwrap_failure(validate_document(&schema, &data));
    let codes: Vec<_> = errors.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["fkNotFound", "invalid_date"]);
}
