use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::{
    domain::{FormDefinition, parse_definition},
    form::FormValues,
};

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Read a document, choosing the format from the file extension.
pub fn read_document(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_document_str(&contents, DocumentFormat::from_path(path))
        .with_context(|| format!("invalid document {}", path.display()))
}

/// Load a form definition and assert its invariants.
pub fn load_definition(path: &Path) -> Result<FormDefinition> {
    let raw = read_document(path)?;
    definition_from_value(&raw).with_context(|| format!("invalid form definition {}", path.display()))
}

pub fn definition_from_str(contents: &str, format: DocumentFormat) -> Result<FormDefinition> {
    let raw = parse_document_str(contents, format)?;
    definition_from_value(&raw)
}

fn definition_from_value(raw: &Value) -> Result<FormDefinition> {
    let definition = parse_definition(raw)?;
    tracing::debug!(
        sections = definition.sections.len(),
        fields = definition.field_count(),
        "loaded form definition"
    );
    Ok(definition)
}

/// Load a value document (an entity to edit or values to validate). The
/// top level must be an object.
pub fn load_values(path: &Path) -> Result<FormValues> {
    match read_document(path)? {
        Value::Object(map) => Ok(map),
        other => bail!(
            "{} must contain an object at the top level, found {}",
            path.display(),
            kind_of(&other)
        ),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
