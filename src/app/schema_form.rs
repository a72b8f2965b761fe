use std::{future::Future, sync::Arc};

use anyhow::Result;
use serde_json::Value;

use crate::{
    domain::FormDefinition,
    form::{FormSession, FormValues, SubmitReply, ValidationSchema},
};

use super::{options::UiOptions, runtime::FormApp};

/// Builder entry point: a definition, optional entity to edit, custom
/// validators and UI options, then [`SchemaForm::run`] with a submit
/// function.
#[derive(Debug)]
pub struct SchemaForm {
    definition: FormDefinition,
    title: Option<String>,
    options: UiOptions,
    validation: ValidationSchema,
    entity: Option<(String, Value)>,
}

impl SchemaForm {
    pub fn new(definition: FormDefinition) -> Self {
        Self {
            definition,
            title: None,
            options: UiOptions::default(),
            validation: ValidationSchema::new(),
            entity: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_validation(mut self, validation: ValidationSchema) -> Self {
        self.validation = validation;
        self
    }

    /// Open in edit mode for `entity`, merged over the field defaults.
    pub fn with_entity(mut self, entity_id: impl Into<String>, entity: Value) -> Self {
        self.entity = Some((entity_id.into(), entity));
        self
    }

    pub fn session(self) -> (FormSession, UiOptions) {
        let SchemaForm {
            mut definition,
            title,
            options,
            validation,
            entity,
        } = self;
        if title.is_some() {
            definition.title = title;
        }
        let definition = Arc::new(definition);
        let session = match entity {
            Some((entity_id, entity)) => {
                FormSession::edit(definition, validation, entity_id, &entity)
            }
            None => FormSession::create(definition, validation),
        };
        (session, options)
    }

    pub fn into_app<S, Fut, R>(self, submit: S) -> FormApp<S>
    where
        S: FnMut(FormValues, Option<String>) -> Fut,
        Fut: Future<Output = R>,
        R: SubmitReply,
    {
        let (session, options) = self.session();
        FormApp::new(session, options, submit)
    }

    /// Run the terminal form until it is saved or closed. Returns the saved
    /// values, or `None` when the user closed the form.
    pub fn run<S, Fut, R>(self, submit: S) -> Result<Option<FormValues>>
    where
        S: FnMut(FormValues, Option<String>) -> Fut,
        Fut: Future<Output = R>,
        R: SubmitReply,
    {
        self.into_app(submit).run()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        domain::{FieldSchema, FieldType, SectionSchema},
        form::FormMode,
    };

    fn definition() -> FormDefinition {
        FormDefinition::build(
            Some("Category".into()),
            None,
            vec![
                SectionSchema::new("Main")
                    .field(FieldSchema::new("name", "Name", FieldType::Text).default_value("New")),
            ],
        )
        .unwrap()
    }

    #[test]
    fn builder_opens_create_mode_with_defaults() {
        let (session, options) = SchemaForm::new(definition())
            .with_title("New category")
            .with_options(UiOptions::default().with_help(false))
            .session();
        assert_eq!(session.mode(), &FormMode::Create);
        assert_eq!(session.definition().title.as_deref(), Some("New category"));
        assert_eq!(session.values().get("name"), Some(&json!("New")));
        assert!(!options.show_help);
    }

    #[test]
    fn builder_opens_edit_mode_with_entity() {
        let (session, _) = SchemaForm::new(definition())
            .with_entity("cat-1", json!({"name": "Drinks"}))
            .session();
        assert_eq!(session.mode().entity_id(), Some("cat-1"));
        assert_eq!(session.values().get("name"), Some(&json!("Drinks")));
    }
}
