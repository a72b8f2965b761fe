mod error;
mod meta;
mod parser;
mod schema;

pub use error::SchemaError;
pub use meta::{check_definition_document, definition_schema};
pub use parser::{FieldEntry, FormDocument, SectionDocument, parse_definition};
pub(crate) use schema::option_matches;
pub use schema::{
    DisplayHint, FieldOption, FieldSchema, FieldType, FormDefinition, Pattern, SectionSchema,
    ValidationRules,
};
