//! Rule-based validation.
//!
//! [`validate`] derives every check from the field schemas themselves;
//! [`ValidationSchema`] layers entity-specific [`CustomValidator`]s on top.
//! Both are pure: the same values and sections always yield the same map.

mod custom;
mod rules;

use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::domain::SectionSchema;

use super::{path, value::FormValues};

pub use custom::{CustomValidator, OrderKind, OrderedPair, UniqueValue};

/// Field name to message, in schema order. A missing key means "valid".
pub type ErrorMap = IndexMap<String, String>;

/// Generic per-field pass over all sections, depth-first in schema order.
pub fn validate(values: &FormValues, sections: &[SectionSchema]) -> ErrorMap {
    let mut errors = ErrorMap::new();
    for field in sections.iter().flat_map(|section| section.fields.iter()) {
        let value = path::lookup(values, &field.name);
        if let Some(message) = rules::check_field(field, value) {
            errors.insert(field.name.clone(), message);
        }
    }
    errors
}

/// Generic validation plus any number of custom validators, run in the order
/// they were added.
#[derive(Clone, Default)]
pub struct ValidationSchema {
    validators: Vec<Arc<dyn CustomValidator>>,
}

impl ValidationSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, validator: impl CustomValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn push(&mut self, validator: impl CustomValidator + 'static) {
        self.validators.push(Arc::new(validator));
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn validate(&self, values: &FormValues, sections: &[SectionSchema]) -> ErrorMap {
        let mut errors = validate(values, sections);
        for validator in &self.validators {
            validator.check(values, sections, &mut errors);
        }
        errors
    }
}

impl fmt::Debug for ValidationSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationSchema")
            .field("validators", &self.validators.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{FieldOption, FieldSchema, FieldType, Pattern, ValidationRules};

    fn values(raw: Value) -> FormValues {
        match raw {
            Value::Object(map) => map,
            _ => FormValues::new(),
        }
    }

    fn single(field: FieldSchema) -> Vec<SectionSchema> {
        vec![SectionSchema::new("Main").field(field)]
    }

    fn errors(pairs: &[(&str, &str)]) -> ErrorMap {
        pairs
            .iter()
            .map(|(name, message)| (name.to_string(), message.to_string()))
            .collect()
    }

    fn plan_name() -> Vec<SectionSchema> {
        single(
            FieldSchema::new("planName", "Plan name", FieldType::Text)
                .required()
                .validation(ValidationRules::default().length(Some(2), Some(50))),
        )
    }

    #[test]
    fn plan_name_scenario() {
        let sections = plan_name();
        assert_eq!(
            validate(&values(json!({"planName": ""})), &sections),
            errors(&[("planName", "Plan name is required")])
        );
        assert_eq!(
            validate(&values(json!({"planName": "A"})), &sections),
            errors(&[("planName", "Plan name should be between 2-50 characters")])
        );
        assert_eq!(
            validate(&values(json!({"planName": "Basic Plan"})), &sections),
            ErrorMap::new()
        );
    }

    #[test]
    fn whitespace_only_is_missing() {
        let sections = plan_name();
        let result = validate(&values(json!({"planName": "   "})), &sections);
        assert_eq!(result["planName"], "Plan name is required");
        let result = validate(&FormValues::new(), &sections);
        assert_eq!(result["planName"], "Plan name is required");
    }

    #[test]
    fn price_scenario() {
        let sections = single(
            FieldSchema::new("price", "Price", FieldType::Number)
                .validation(ValidationRules::default().range(Some(0.0), None)),
        );
        assert_eq!(
            validate(&values(json!({"price": -5})), &sections),
            errors(&[("price", "Price should be at least 0")])
        );
        assert!(validate(&values(json!({"price": 0})), &sections).is_empty());
        assert_eq!(
            validate(&values(json!({"price": "abc"})), &sections),
            errors(&[("price", "Price must be a valid number")])
        );
        assert!(validate(&values(json!({"price": "12.5"})), &sections).is_empty());
    }

    #[test]
    fn numeric_range_message_states_both_bounds() {
        let sections = single(
            FieldSchema::new("discount", "Discount", FieldType::Number)
                .validation(ValidationRules::default().range(Some(0.0), Some(100.0))),
        );
        assert_eq!(
            validate(&values(json!({"discount": 150})), &sections)["discount"],
            "Discount should be between 0-100"
        );
        assert!(validate(&values(json!({"discount": 100})), &sections).is_empty());
    }

    #[test]
    fn pattern_violation_uses_custom_message() {
        let rules = ValidationRules::default()
            .pattern(Pattern::new(r"^[A-Z]{3}\d{2}$").unwrap())
            .message("Code must look like ABC12");
        let sections = single(FieldSchema::new("code", "Code", FieldType::Text).validation(rules));
        assert_eq!(
            validate(&values(json!({"code": "abc"})), &sections)["code"],
            "Code must look like ABC12"
        );
        assert!(validate(&values(json!({"code": "ABC12"})), &sections).is_empty());
    }

    #[test]
    fn pattern_violation_without_message_is_generic() {
        let rules = ValidationRules::default().pattern(Pattern::new(r"^\d+$").unwrap());
        let sections = single(FieldSchema::new("pin", "PIN", FieldType::Text).validation(rules));
        assert_eq!(
            validate(&values(json!({"pin": "12a"})), &sections)["pin"],
            "Invalid format for PIN"
        );
    }

    #[test]
    fn required_wins_over_every_other_rule() {
        let rules = ValidationRules::default()
            .pattern(Pattern::new(r"^x+$").unwrap())
            .length(Some(3), None)
            .message("custom");
        let sections = single(
            FieldSchema::new("name", "Name", FieldType::Text)
                .required()
                .validation(rules),
        );
        assert_eq!(
            validate(&values(json!({"name": ""})), &sections)["name"],
            "Name is required"
        );
    }

    #[test]
    fn pattern_is_checked_before_bounds() {
        let rules = ValidationRules::default()
            .pattern(Pattern::new(r"^[a-z]+$").unwrap())
            .length(Some(5), None);
        let sections = single(FieldSchema::new("slug", "Slug", FieldType::Text).validation(rules));
        assert_eq!(
            validate(&values(json!({"slug": "AB"})), &sections)["slug"],
            "Invalid format for Slug"
        );
        assert_eq!(
            validate(&values(json!({"slug": "ab"})), &sections)["slug"],
            "Slug should be at least 5 characters"
        );
    }

    #[test]
    fn optional_empty_fields_skip_format_checks() {
        let sections = single(FieldSchema::new("email", "Email", FieldType::Email));
        assert!(validate(&values(json!({"email": ""})), &sections).is_empty());
        assert_eq!(
            validate(&values(json!({"email": "not-an-email"})), &sections)["email"],
            "Invalid format for Email"
        );
        assert!(validate(&values(json!({"email": "ops@hotel.in"})), &sections).is_empty());
    }

    #[test]
    fn select_values_must_be_known_options() {
        let sections = vec![
            SectionSchema::new("Plan")
                .field(
                    FieldSchema::new("tier", "Tier", FieldType::Select).options([
                        FieldOption::new("basic", "Basic"),
                        FieldOption::new("pro", "Pro"),
                    ]),
                )
                .field(
                    FieldSchema::new("features", "Features", FieldType::CheckboxGroup)
                        .options([
                            FieldOption::new("qr", "QR menu"),
                            FieldOption::new("offers", "Offers"),
                        ])
                        .validation(ValidationRules::default().length(Some(1), Some(1))),
                ),
        ];
        let result = validate(
            &values(json!({"tier": "gold", "features": ["qr", "offers"]})),
            &sections,
        );
        assert_eq!(
            result,
            errors(&[
                ("tier", "Tier has an unknown option"),
                ("features", "Features should be between 1-1 selections"),
            ])
        );
        assert!(validate(&values(json!({"tier": "pro", "features": ["qr"]})), &sections).is_empty());
    }

    #[test]
    fn nested_fields_are_resolved_through_paths() {
        let sections = single(
            FieldSchema::new("limits.maxCaptains", "Max captains", FieldType::Number)
                .required()
                .validation(ValidationRules::default().range(Some(1.0), None)),
        );
        assert_eq!(
            validate(&values(json!({"limits": {"maxCaptains": 0}})), &sections)
                ["limits.maxCaptains"],
            "Max captains should be at least 1"
        );
        assert_eq!(
            validate(&values(json!({"limits": {}})), &sections)["limits.maxCaptains"],
            "Max captains is required"
        );
    }

    #[test]
    fn validation_is_pure() {
        let sections = plan_name();
        let input = values(json!({"planName": "A"}));
        assert_eq!(validate(&input, &sections), validate(&input, &sections));
    }

    #[test]
    fn date_range_scenario() {
        let sections = vec![
            SectionSchema::new("Offer")
                .field(FieldSchema::new("validFrom", "Valid from", FieldType::Date))
                .field(FieldSchema::new("validUntil", "Valid until", FieldType::Date)),
        ];
        let schema = ValidationSchema::new().with(
            OrderedPair::dates("validFrom", "validUntil")
                .message("Valid until must be on or after valid from"),
        );
        assert_eq!(
            schema.validate(
                &values(json!({"validFrom": "2024-06-01", "validUntil": "2024-05-01"})),
                &sections
            ),
            errors(&[("validUntil", "Valid until must be on or after valid from")])
        );
        assert!(
            schema
                .validate(
                    &values(json!({"validFrom": "2024-06-01", "validUntil": "2024-06-01"})),
                    &sections
                )
                .is_empty()
        );
    }

    #[test]
    fn unpadded_dates_are_malformed() {
        let sections = single(FieldSchema::new("validFrom", "Valid from", FieldType::Date));
        assert_eq!(
            validate(&values(json!({"validFrom": "2024-6-1"})), &sections),
            errors(&[("validFrom", "Invalid format for Valid from")])
        );
        assert!(validate(&values(json!({"validFrom": "2024-06-01"})), &sections).is_empty());
    }

    #[test]
    fn ordering_skips_unpadded_dates() {
        let sections = vec![
            SectionSchema::new("Offer")
                .field(FieldSchema::new("validFrom", "Valid from", FieldType::Date))
                .field(FieldSchema::new("validUntil", "Valid until", FieldType::Date)),
        ];
        let schema = ValidationSchema::new().with(OrderedPair::dates("validFrom", "validUntil"));
        assert_eq!(
            schema.validate(
                &values(json!({"validFrom": "2024-6-1", "validUntil": "2024-05-01"})),
                &sections
            ),
            errors(&[("validFrom", "Invalid format for Valid from")])
        );
    }

    #[test]
    fn ordering_message_names_the_lower_label() {
        let sections = vec![
            SectionSchema::new("Offer")
                .field(FieldSchema::new("validFrom", "Valid from", FieldType::Date))
                .field(FieldSchema::new("validUntil", "Valid until", FieldType::Date)),
        ];
        let schema = ValidationSchema::new().with(OrderedPair::dates("validFrom", "validUntil"));
        assert_eq!(
            schema.validate(
                &values(json!({"validFrom": "2024-06-01", "validUntil": "2024-05-01"})),
                &sections
            ),
            errors(&[("validUntil", "Must not be earlier than Valid from")])
        );

        let unlisted = ValidationSchema::new().with(OrderedPair::numbers("floor", "ceiling"));
        assert_eq!(
            unlisted.validate(&values(json!({"floor": 5, "ceiling": 2})), &sections),
            errors(&[("ceiling", "Must not be earlier than floor")])
        );
    }

    #[test]
    fn duplicate_names_are_flagged_except_in_own_edit() {
        let sections = plan_name();
        let existing = vec!["Basic Plan".to_string(), "Premium".to_string()];
        let create = ValidationSchema::new().with(
            UniqueValue::new("planName", existing.clone()).message("Plan name already exists"),
        );
        assert_eq!(
            create.validate(&values(json!({"planName": " basic plan "})), &sections)["planName"],
            "Plan name already exists"
        );

        let edit = ValidationSchema::new()
            .with(UniqueValue::new("planName", existing).editing("Basic Plan"));
        assert!(
            edit.validate(&values(json!({"planName": "Basic Plan"})), &sections)
                .is_empty()
        );
    }

    #[test]
    fn closures_can_override_generic_messages() {
        let sections = plan_name();
        let schema = ValidationSchema::new().with(|values: &FormValues, errors: &mut ErrorMap| {
            if values.get("planName").and_then(Value::as_str) == Some("A") {
                errors.insert("planName".to_string(), "Too short".to_string());
            }
        });
        assert_eq!(
            schema.validate(&values(json!({"planName": "A"})), &sections)["planName"],
            "Too short"
        );
    }
}
