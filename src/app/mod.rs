mod focus;
mod options;
mod runtime;
mod schema_form;
mod status;
mod terminal;

pub use focus::FocusCursor;
pub use options::UiOptions;
pub use runtime::FormApp;
pub use schema_form::SchemaForm;
