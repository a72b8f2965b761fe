use serde_json::{Map, Value};

use super::{error::FormError, value::FormValues};

/// Read a field through the `parent.child` convention.
pub fn lookup<'a>(values: &'a FormValues, name: &str) -> Option<&'a Value> {
    let mut segments = name.split('.');
    let mut current = values.get(segments.next()?)?;
    for segment in segments {
        match current {
            Value::Object(map) => current = map.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Write a field through the `parent.child` convention. Missing (or null)
/// parents are created as empty objects; siblings of the written key are kept.
pub fn assign(values: &mut FormValues, name: &str, value: Value) -> Result<(), FormError> {
    let segments: Vec<&str> = name.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(FormError::InvalidPath(name.to_string()));
    }
    let (leaf, parents) = segments
        .split_last()
        .ok_or_else(|| FormError::InvalidPath(name.to_string()))?;

    let mut current = values;
    for (depth, segment) in parents.iter().enumerate() {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if slot.is_null() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => {
                return Err(FormError::PathConflict {
                    name: name.to_string(),
                    parent: segments[..=depth].join("."),
                });
            }
        };
    }
    current.insert(leaf.to_string(), value);
    Ok(())
}
