use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("field path `{0}` is empty or has an empty segment")]
    InvalidPath(String),

    #[error("cannot write `{name}`: `{parent}` holds a non-object value")]
    PathConflict { name: String, parent: String },

    #[error("the form is closed")]
    Closed,
}
