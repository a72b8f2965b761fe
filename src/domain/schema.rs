use std::fmt;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Input family of a field. Unknown tags survive deserialization as `Other`
/// so the view can render a placeholder instead of rejecting the whole form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Url,
    Number,
    Textarea,
    Select,
    MultiSelect,
    Checkbox,
    CheckboxGroup,
    Password,
    Date,
    Time,
    Object,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Url => "url",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multiselect",
            FieldType::Checkbox => "checkbox",
            FieldType::CheckboxGroup => "checkbox-group",
            FieldType::Password => "password",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Object => "object",
            FieldType::Other(tag) => tag,
        }
    }

    /// Select-family fields must carry a non-empty option list.
    pub fn needs_options(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::MultiSelect | FieldType::CheckboxGroup
        )
    }

    /// Fields whose value is an array of option values.
    pub fn is_multi(&self) -> bool {
        matches!(self, FieldType::MultiSelect | FieldType::CheckboxGroup)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FieldType::Other(_))
    }

    /// Value a field of this type starts with when no default is configured.
    pub fn empty_value(&self) -> Value {
        match self {
            FieldType::MultiSelect | FieldType::CheckboxGroup => Value::Array(Vec::new()),
            FieldType::Checkbox => Value::Bool(false),
            FieldType::Object => Value::Object(Default::default()),
            _ => Value::String(String::new()),
        }
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        match tag {
            "text" => FieldType::Text,
            "email" => FieldType::Email,
            "tel" => FieldType::Tel,
            "url" => FieldType::Url,
            "number" => FieldType::Number,
            "textarea" => FieldType::Textarea,
            "select" => FieldType::Select,
            "multiselect" => FieldType::MultiSelect,
            "checkbox" => FieldType::Checkbox,
            "checkbox-group" => FieldType::CheckboxGroup,
            "password" => FieldType::Password,
            "date" => FieldType::Date,
            "time" => FieldType::Time,
            "object" => FieldType::Object,
            other => FieldType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(FieldType::from(tag.as_str()))
    }
}

/// Presentation tweak that renderers apply without looking at field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayHint {
    CurrencyPrefix,
    PercentSuffix,
    Multiline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldOption {
    pub value: Value,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A compiled `validation.pattern`. Serialized as its source text.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Pattern)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub pattern: Option<Pattern>,
    /// Replaces the generated message for every rule except `required`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationRules {
    pub fn length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    #[schemars(with = "String")]
    pub kind: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_hint: Option<DisplayHint>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            default_value: None,
            options: Vec::new(),
            validation: None,
            placeholder: None,
            description: None,
            display_hint: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = FieldOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    pub fn validation(mut self, rules: ValidationRules) -> Self {
        self.validation = Some(rules);
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn hint(mut self, hint: DisplayHint) -> Self {
        self.display_hint = Some(hint);
        self
    }

    /// Segments of a nested `parent.child` name.
    pub fn path(&self) -> impl Iterator<Item = &str> {
        self.name.split('.')
    }

    pub fn is_nested(&self) -> bool {
        self.name.contains('.')
    }

    pub fn initial_value(&self) -> Value {
        self.default_value
            .clone()
            .unwrap_or_else(|| self.kind.empty_value())
    }

    pub fn option_label(&self, value: &Value) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option_matches(&option.value, value))
            .map(|option| option.label.as_str())
    }

    pub fn has_option(&self, value: &Value) -> bool {
        self.options
            .iter()
            .any(|option| option_matches(&option.value, value))
    }
}

/// JSON equality, then string form unless both sides are strings.
pub(crate) fn option_matches(option: &Value, value: &Value) -> bool {
    if option == value {
        return true;
    }
    match (option, value) {
        (Value::String(_), Value::String(_)) => false,
        _ => crate::form::value_to_string(option) == crate::form::value_to_string(value),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SectionSchema {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    pub fields: Vec<FieldSchema>,
}

impl SectionSchema {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            icon: None,
            required: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn marked_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }
}

/// A validated, immutable form definition. Build one with
/// [`FormDefinition::build`] or [`crate::domain::parse_definition`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormDefinition {
    pub title: Option<String>,
    pub description: Option<String>,
    pub sections: Vec<SectionSchema>,
}

impl FormDefinition {
    pub fn fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields().find(|field| field.name == name)
    }

    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|section| section.fields.len()).sum()
    }
}
