use serde_json::Value;

use super::{error::SchemaError, parser::FormDocument};

/// JSON Schema describing a form definition document.
pub fn definition_schema() -> Value {
    let root = schemars::schema_for!(FormDocument);
    serde_json::to_value(root).unwrap_or(Value::Null)
}

/// Check a raw definition document against [`definition_schema`], collecting
/// every structural issue with its JSON pointer.
pub fn check_definition_document(raw: &Value) -> Result<(), SchemaError> {
    let schema = definition_schema();
    let validator = jsonschema::validator_for(&schema).map_err(|err| SchemaError::Document {
        issues: vec![format!("meta schema failed to compile: {err}")],
    })?;
    let issues: Vec<String> = validator
        .iter_errors(raw)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let pointer = if pointer.is_empty() {
                "<root>".to_string()
            } else {
                pointer
            };
            format!("{pointer}: {error}")
        })
        .collect();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Document { issues })
    }
}
