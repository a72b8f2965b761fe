use pretty_assertions::assert_eq;
use schemaform::prelude::*;
use serde_json::{Value, json};

fn values(value: Value) -> FormValues {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn plan_section() -> SectionSchema {
    SectionSchema::new("Plan").field(
        FieldSchema::new("planName", "Plan name", FieldType::Text)
            .required()
            .validation(ValidationRules::default().length(Some(2), Some(50))),
    )
}

#[test]
fn plan_name_runs_required_then_bounds() {
    let sections = [plan_section()];

    let errors = validate(&values(json!({"planName": ""})), &sections);
    assert_eq!(errors.get("planName").map(String::as_str), Some("Plan name is required"));

    let errors = validate(&values(json!({"planName": "A"})), &sections);
    assert_eq!(
        errors.get("planName").map(String::as_str),
        Some("Plan name should be between 2-50 characters")
    );

    assert!(validate(&values(json!({"planName": "Basic Plan"})), &sections).is_empty());
}

#[test]
fn price_rejects_negative_and_non_numeric() {
    let sections = [SectionSchema::new("Pricing").field(
        FieldSchema::new("price", "Price", FieldType::Number)
            .validation(ValidationRules::default().range(Some(0.0), None)),
    )];

    assert!(validate(&values(json!({"price": -5})), &sections).contains_key("price"));
    assert!(validate(&values(json!({"price": 0})), &sections).is_empty());
    assert!(validate(&values(json!({"price": "0"})), &sections).is_empty());
    assert_eq!(
        validate(&values(json!({"price": "abc"})), &sections)
            .get("price")
            .map(String::as_str),
        Some("Price must be a valid number")
    );
}

#[test]
fn valid_until_must_not_precede_valid_from() {
    let sections = [SectionSchema::new("Validity")
        .field(FieldSchema::new("validFrom", "Valid from", FieldType::Date))
        .field(FieldSchema::new("validUntil", "Valid until", FieldType::Date))];
    let schema = ValidationSchema::new().with(OrderedPair::dates("validFrom", "validUntil"));

    let errors = schema.validate(
        &values(json!({"validFrom": "2024-06-01", "validUntil": "2024-05-01"})),
        &sections,
    );
    assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["validUntil"]);

    let errors = schema.validate(
        &values(json!({"validFrom": "2024-06-01", "validUntil": "2024-06-01"})),
        &sections,
    );
    assert!(errors.is_empty());
}

#[test]
fn every_required_field_reports_blank_values() {
    let sections = [SectionSchema::new("Contact")
        .field(FieldSchema::new("name", "Name", FieldType::Text).required())
        .field(FieldSchema::new("email", "Email", FieldType::Email).required())
        .field(
            FieldSchema::new("tags", "Tags", FieldType::MultiSelect)
                .required()
                .options([FieldOption::new("a", "A"), FieldOption::new("b", "B")]),
        )
        .field(FieldSchema::new("address.city", "City", FieldType::Text).required())];

    let blank = values(json!({"name": "  ", "email": "", "tags": [], "address": {"city": ""}}));
    let errors = validate(&blank, &sections);
    assert_eq!(
        errors.keys().cloned().collect::<Vec<_>>(),
        vec!["name", "email", "tags", "address.city"]
    );

    let filled = values(json!({
        "name": "Ravi",
        "email": "ravi@example.com",
        "tags": ["a"],
        "address": {"city": "Pune"}
    }));
    assert!(validate(&filled, &sections).is_empty());
}

#[test]
fn pattern_matches_decide_the_error() {
    let sections = [SectionSchema::new("Offer").field(
        FieldSchema::new("code", "Coupon code", FieldType::Text).validation(
            ValidationRules::default().pattern(Pattern::new("^[A-Z0-9]{4,12}$").unwrap()),
        ),
    )];
    for bad in ["abc", "lower123", "TOO-MANY-DASHES"] {
        assert!(
            validate(&values(json!({"code": bad})), &sections).contains_key("code"),
            "{bad} should be rejected"
        );
    }
    for good in ["SAVE10", "WELCOME2026"] {
        assert!(validate(&values(json!({"code": good})), &sections).is_empty());
    }
}

#[test]
fn custom_message_replaces_generated_text_but_not_required() {
    let sections = [SectionSchema::new("Offer").field(
        FieldSchema::new("discount", "Discount", FieldType::Number)
            .required()
            .validation(
                ValidationRules::default()
                    .range(Some(1.0), Some(90.0))
                    .message("Pick a discount between 1 and 90"),
            ),
    )];
    assert_eq!(
        validate(&values(json!({"discount": 95})), &sections)["discount"],
        "Pick a discount between 1 and 90"
    );
    assert_eq!(
        validate(&values(json!({"discount": ""})), &sections)["discount"],
        "Discount is required"
    );
}

#[test]
fn validation_is_repeatable() {
    let sections = [plan_section()];
    let input = values(json!({"planName": "A"}));
    let schema = ValidationSchema::new().with(UniqueValue::new("planName", ["a".to_string()]));
    let first = schema.validate(&input, &sections);
    let second = schema.validate(&input, &sections);
    assert_eq!(first, second);
}

#[test]
fn duplicate_names_ignore_the_entity_being_edited() {
    let sections = [plan_section()];
    let existing = ["Basic".to_string(), "Premium".to_string()];

    let create = ValidationSchema::new().with(UniqueValue::new("planName", existing.clone()));
    assert!(create
        .validate(&values(json!({"planName": " premium "})), &sections)
        .contains_key("planName"));

    let edit = ValidationSchema::new()
        .with(UniqueValue::new("planName", existing).editing("Premium"));
    assert!(edit
        .validate(&values(json!({"planName": "Premium"})), &sections)
        .is_empty());
}

#[test]
fn closures_work_as_custom_validators() {
    let sections = [plan_section()];
    let schema = ValidationSchema::new().with(|values: &FormValues, errors: &mut ErrorMap| {
        if values.get("planName") == Some(&json!("Reserved")) {
            errors.insert("planName".to_string(), "That name is reserved".to_string());
        }
    });
    assert_eq!(
        schema.validate(&values(json!({"planName": "Reserved"})), &sections)["planName"],
        "That name is reserved"
    );
}
