use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde_json::Value;

use crate::domain::{FieldSchema, FieldType, ValidationRules};
use crate::form::value::{is_blank, parse_number, value_to_string};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("url pattern compiles"));
static TEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ()\-]{5,19}$").expect("tel pattern compiles"));
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern compiles"));

/// Run the generic checks for one field. Order: required, type format,
/// pattern, bounds. The first violation wins.
pub(super) fn check_field(field: &FieldSchema, value: Option<&Value>) -> Option<String> {
    if is_blank(value) {
        return field
            .required
            .then(|| format!("{} is required", field.label));
    }
    let value = value?;
    let rules = field.validation.as_ref();

    if let Some(message) = check_format(field, value) {
        return Some(custom_or(rules, message));
    }

    if let Some(pattern) = rules.and_then(|rules| rules.pattern.as_ref())
        && !pattern.is_match(&value_to_string(value))
    {
        return Some(custom_or(
            rules,
            format!("Invalid format for {}", field.label),
        ));
    }

    let rules = rules?;
    let violation = if field.kind == FieldType::Number {
        parse_number(value).and_then(|number| numeric_bounds(field, rules, number))
    } else if let Value::Array(items) = value {
        length_bounds(field, rules, items.len(), "selections")
    } else {
        length_bounds(
            field,
            rules,
            value_to_string(value).chars().count(),
            "characters",
        )
    };
    violation.map(|message| custom_or(Some(rules), message))
}

fn custom_or(rules: Option<&ValidationRules>, generated: String) -> String {
    rules
        .and_then(|rules| rules.message.clone())
        .unwrap_or(generated)
}

fn check_format(field: &FieldSchema, value: &Value) -> Option<String> {
    let label = &field.label;
    let text = || value.as_str().map(str::trim);
    let well_formed = match &field.kind {
        FieldType::Number => {
            if parse_number(value).is_none() {
                return Some(format!("{label} must be a valid number"));
            }
            true
        }
        FieldType::Email => text().is_some_and(|text| EMAIL.is_match(text)),
        FieldType::Url => text().is_some_and(|text| URL.is_match(text)),
        FieldType::Tel => text().is_some_and(|text| TEL.is_match(text)),
        FieldType::Date => text().is_some_and(|text| parse_date(text).is_some()),
        FieldType::Time => text().is_some_and(|text| parse_time(text).is_some()),
        FieldType::Checkbox => value.is_boolean(),
        FieldType::Select => {
            if !field.has_option(value) {
                return Some(format!("{label} has an unknown option"));
            }
            true
        }
        FieldType::MultiSelect | FieldType::CheckboxGroup => match value {
            Value::Array(items) => {
                if items.iter().any(|item| !field.has_option(item)) {
                    return Some(format!("{label} has an unknown option"));
                }
                true
            }
            _ => false,
        },
        FieldType::Object => value.is_object(),
        FieldType::Text | FieldType::Textarea | FieldType::Password | FieldType::Other(_) => {
            matches!(value, Value::String(_) | Value::Number(_))
        }
    };
    (!well_formed).then(|| format!("Invalid format for {label}"))
}

/// Zero-padded `YYYY-MM-DD` only.
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    if !DATE.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

pub(crate) fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()
}

fn length_bounds(
    field: &FieldSchema,
    rules: &ValidationRules,
    len: usize,
    unit: &str,
) -> Option<String> {
    let label = &field.label;
    let below = rules.min_length.is_some_and(|min| len < min);
    let above = rules.max_length.is_some_and(|max| len > max);
    if !below && !above {
        return None;
    }
    Some(match (rules.min_length, rules.max_length) {
        (Some(min), Some(max)) => format!("{label} should be between {min}-{max} {unit}"),
        (Some(min), None) => format!("{label} should be at least {min} {unit}"),
        (None, Some(max)) => format!("{label} should be at most {max} {unit}"),
        (None, None) => return None,
    })
}

fn numeric_bounds(field: &FieldSchema, rules: &ValidationRules, number: f64) -> Option<String> {
    let label = &field.label;
    let below = rules.min.is_some_and(|min| number < min);
    let above = rules.max.is_some_and(|max| number > max);
    if !below && !above {
        return None;
    }
    Some(match (rules.min, rules.max) {
        (Some(min), Some(max)) => format!("{label} should be between {min}-{max}"),
        (Some(min), None) => format!("{label} should be at least {min}"),
        (None, Some(max)) => format!("{label} should be at most {max}"),
        (None, None) => return None,
    })
}
