use std::collections::{BTreeMap, HashMap, HashSet};

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::{
    error::SchemaError,
    meta::check_definition_document,
    schema::{FieldSchema, FieldType, FormDefinition, Pattern, SectionSchema},
};

/// Serialized shape of a form definition. Sections may list fields inline or
/// by key into `fieldsMap`; keys are resolved once in [`parse_definition`].
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields_map: BTreeMap<String, FieldSchema>,
    pub sections: Vec<SectionDocument>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SectionDocument {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    pub fields: Vec<FieldEntry>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldEntry {
    Key(String),
    Inline(FieldSchema),
}

/// Parse a raw definition document (already decoded from JSON/YAML/TOML).
pub fn parse_definition(raw: &Value) -> Result<FormDefinition, SchemaError> {
    check_definition_document(raw)?;
    precompile_patterns(raw)?;
    let document: FormDocument = serde_json::from_value(raw.clone())?;
    document.resolve()
}

impl FormDocument {
    pub fn resolve(self) -> Result<FormDefinition, SchemaError> {
        let FormDocument {
            title,
            description,
            fields_map,
            sections,
        } = self;
        let mut resolved = Vec::with_capacity(sections.len());
        for section in sections {
            let mut fields = Vec::with_capacity(section.fields.len());
            for entry in section.fields {
                match entry {
                    FieldEntry::Inline(field) => fields.push(field),
                    FieldEntry::Key(key) => {
                        let field = fields_map.get(&key).cloned().ok_or_else(|| {
                            SchemaError::UnknownFieldKey {
                                section: section.title.clone(),
                                key: key.clone(),
                            }
                        })?;
                        fields.push(field);
                    }
                }
            }
            resolved.push(SectionSchema {
                title: section.title,
                description: section.description,
                icon: section.icon,
                required: section.required,
                fields,
            });
        }
        FormDefinition::build(title, description, resolved)
    }
}

impl FormDefinition {
    /// Assemble a definition and assert its structural invariants.
    pub fn build(
        title: Option<String>,
        description: Option<String>,
        sections: Vec<SectionSchema>,
    ) -> Result<Self, SchemaError> {
        let definition = FormDefinition {
            title,
            description,
            sections,
        };
        definition.assert_invariants()?;
        Ok(definition)
    }

    fn assert_invariants(&self) -> Result<(), SchemaError> {
        let mut titles = HashSet::new();
        for section in &self.sections {
            if !titles.insert(section.title.as_str()) {
                return Err(SchemaError::DuplicateSection(section.title.clone()));
            }
        }

        let mut kinds: HashMap<&str, &FieldType> = HashMap::new();
        for field in self.fields() {
            if kinds.insert(field.name.as_str(), &field.kind).is_some() {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            if field.kind.needs_options() && field.options.is_empty() {
                return Err(SchemaError::MissingOptions {
                    field: field.name.clone(),
                    kind: field.kind.to_string(),
                });
            }
            if field.path().any(str::is_empty) {
                return Err(SchemaError::InvalidPath {
                    field: field.name.clone(),
                    reason: "empty path segment".to_string(),
                });
            }
            if !field.kind.is_known() {
                tracing::warn!(
                    field = %field.name,
                    kind = %field.kind,
                    "field type has no renderer; it will render as a placeholder"
                );
            }
        }

        for field in self.fields().filter(|field| field.is_nested()) {
            let mut prefix = String::new();
            for segment in field.name.split('.').take(field.name.split('.').count() - 1) {
                if !prefix.is_empty() {
                    prefix.push('.');
                }
                prefix.push_str(segment);
                if let Some(kind) = kinds.get(prefix.as_str())
                    && **kind != FieldType::Object
                {
                    return Err(SchemaError::InvalidPath {
                        field: field.name.clone(),
                        reason: format!("parent `{prefix}` is a `{kind}` field, not an object"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Compile every `validation.pattern` up front so a bad regex is reported
/// with its JSON pointer. Only field rule sets are visited; defaults and
/// option values are data and may hold any key.
fn precompile_patterns(raw: &Value) -> Result<(), SchemaError> {
    if let Some(Value::Object(fields)) = raw.get("fieldsMap") {
        for (key, field) in fields {
            check_field_pattern(field, &format!("/fieldsMap/{}", escape_pointer(key)))?;
        }
    }
    if let Some(Value::Array(sections)) = raw.get("sections") {
        for (section_idx, section) in sections.iter().enumerate() {
            let Some(Value::Array(fields)) = section.get("fields") else {
                continue;
            };
            for (field_idx, field) in fields.iter().enumerate() {
                check_field_pattern(field, &format!("/sections/{section_idx}/fields/{field_idx}"))?;
            }
        }
    }
    Ok(())
}

fn check_field_pattern(field: &Value, pointer: &str) -> Result<(), SchemaError> {
    let Some(Value::String(source)) = field.pointer("/validation/pattern") else {
        return Ok(());
    };
    Pattern::new(source)
        .map(drop)
        .map_err(|err| SchemaError::InvalidPattern {
            pointer: format!("{pointer}/validation/pattern"),
            message: err.to_string(),
        })
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
