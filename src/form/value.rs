use serde_json::{Map, Value};

use crate::domain::SectionSchema;

use super::path;

/// Current values of one form instance, keyed by field name or, for nested
/// fields, by parent key.
pub type FormValues = Map<String, Value>;

pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(num) => num.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Null, blank-after-trim strings, empty arrays and empty objects count as
/// "no value".
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

/// Strict numeric reading: JSON numbers and numeric strings only. Anything
/// else yields `None` instead of falling back to zero.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(num) => num.as_f64(),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite()),
        _ => None,
    }
}

/// Recursively merge `overlay` into `base`: objects merge key by key, every
/// other value replaces what was there.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(this), Value::Object(other)) => {
            for (key, value) in other {
                if let Some(existing) = this.get_mut(key) {
                    deep_merge(existing, value);
                } else {
                    this.insert(key.clone(), value.clone());
                }
            }
        }
        (this, other) => *this = other.clone(),
    }
}

/// Default value map for a set of sections: every field's `defaultValue`, or
/// an empty value of its type, written through the nested-path convention.
pub fn defaults_for(sections: &[SectionSchema]) -> FormValues {
    let mut values = FormValues::new();
    for field in sections.iter().flat_map(|section| section.fields.iter()) {
        let mut initial = field.initial_value();
        if let Some(existing) = path::lookup(&values, &field.name) {
            if field.default_value.is_none() {
                continue;
            }
            if existing.is_object() && initial.is_object() {
                deep_merge(&mut initial, existing);
            }
        }
        if let Err(err) = path::assign(&mut values, &field.name, initial) {
            tracing::warn!(field = %field.name, error = %err, "skipping default value");
        }
    }
    values
}
