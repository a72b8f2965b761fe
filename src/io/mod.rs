//! Reading definition and value documents, writing submitted values.

mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{
    definition_from_str, load_definition, load_values, parse_document_str, read_document,
};
pub use output::{OutputDestination, OutputOptions, emit, render};
