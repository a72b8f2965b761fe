use serde_json::Value;

use crate::domain::SectionSchema;

use super::{path, value::{FormValues, value_to_string}};

/// Share of required fields that hold a value, rounded to a whole percent.
/// Display only; it has no say in whether a form can be submitted. A form
/// with no required fields reports 100.
pub fn completion_percentage(values: &FormValues, sections: &[SectionSchema]) -> u8 {
    let (total, completed) = sections
        .iter()
        .flat_map(|section| section.fields.iter())
        .filter(|field| field.required)
        .fold((0usize, 0usize), |(total, completed), field| {
            let filled = path::lookup(values, &field.name).is_some_and(is_filled);
            (total + 1, completed + usize::from(filled))
        });
    if total == 0 {
        return 100;
    }
    ((completed as f64 * 100.0) / total as f64).round() as u8
}

fn is_filled(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        other => !value_to_string(other).trim().is_empty(),
    }
}
