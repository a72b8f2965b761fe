use thiserror::Error;

/// Problems detected while building a form definition. These fail fast at
/// definition time; nothing here is raised while a form is being edited.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),

    #[error("section `{0}` is declared more than once")]
    DuplicateSection(String),

    #[error("field `{field}` of type `{kind}` needs at least one option")]
    MissingOptions { field: String, kind: String },

    #[error("section `{section}` references unknown field key `{key}`")]
    UnknownFieldKey { section: String, key: String },

    #[error("invalid pattern at {pointer}: {message}")]
    InvalidPattern { pointer: String, message: String },

    #[error("invalid field path `{field}`: {reason}")]
    InvalidPath { field: String, reason: String },

    #[error("definition document has {} issue(s): {}", .issues.len(), .issues.join("; "))]
    Document { issues: Vec<String> },

    #[error("failed to decode definition: {0}")]
    Parse(#[from] serde_json::Error),
}
