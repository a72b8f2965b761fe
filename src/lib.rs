#![deny(rust_2018_idioms)]

//! Configuration-driven forms.
//!
//! A form is described by [`domain::FormDefinition`]: ordered sections of
//! field schemas. [`form::FormSession`] holds the live values, re-validates
//! them after every change, runs the submission pipeline against an
//! injected async submit function and guards closing a dirty form.
//! [`presentation`] turns field schemas into terminal widgets and
//! [`app::SchemaForm`] hosts a whole form in the terminal.

#[cfg(feature = "tui")]
pub mod app;
pub mod domain;
pub mod form;
pub mod io;
pub mod presentation;
#[cfg(feature = "tui")]
mod ui;

#[cfg(feature = "tui")]
pub use app::{FormApp, SchemaForm, UiOptions};
pub use domain::{FieldSchema, FieldType, FormDefinition, SchemaError, SectionSchema};
pub use form::{
    ErrorMap, FormError, FormSession, FormValues, SubmitOutcome, ValidationSchema, validate,
};

pub mod prelude {
    #[cfg(feature = "tui")]
    pub use crate::app::{SchemaForm, UiOptions};
    pub use crate::domain::{
        DisplayHint, FieldOption, FieldSchema, FieldType, FormDefinition, Pattern, SchemaError,
        SectionSchema, ValidationRules, parse_definition,
    };
    pub use crate::form::{
        CustomValidator, ErrorMap, FormError, FormMode, FormSession, FormValues, OrderedPair,
        SubmitOutcome, UniqueValue, ValidationSchema, completion_percentage, request_close,
        validate,
    };
    pub use crate::io::{DocumentFormat, OutputOptions, load_definition, load_values};
    pub use crate::presentation::{FieldRenderer, RenderPalette, RendererRegistry};
}
