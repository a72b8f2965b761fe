use std::{future::Future, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::FormDefinition;

use super::{
    error::FormError,
    guard,
    progress::completion_percentage,
    state::FormState,
    submit::{SubmitAttempt, SubmitOutcome, SubmitReply},
    validation::{ErrorMap, ValidationSchema},
    value::{FormValues, defaults_for},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { entity_id: String },
}

impl FormMode {
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            FormMode::Create => None,
            FormMode::Edit { entity_id } => Some(entity_id),
        }
    }
}

/// One open form: its definition, validators, live state and mode.
///
/// The session re-validates after every change once the form is dirty, runs
/// the submission pipeline and applies the close guard.
#[derive(Debug, Clone)]
pub struct FormSession {
    definition: Arc<FormDefinition>,
    validation: ValidationSchema,
    state: FormState,
    mode: FormMode,
    open: bool,
}

impl FormSession {
    /// Open an add-mode form populated from field defaults.
    pub fn create(definition: Arc<FormDefinition>, validation: ValidationSchema) -> Self {
        let defaults = defaults_for(&definition.sections);
        debug!(fields = definition.field_count(), "opening form in create mode");
        Self {
            state: FormState::initialize(None, &defaults),
            definition,
            validation,
            mode: FormMode::Create,
            open: true,
        }
    }

    /// Open an edit-mode form for an existing entity, merged over defaults.
    pub fn edit(
        definition: Arc<FormDefinition>,
        validation: ValidationSchema,
        entity_id: impl Into<String>,
        entity: &Value,
    ) -> Self {
        let entity_id = entity_id.into();
        let defaults = defaults_for(&definition.sections);
        debug!(%entity_id, "opening form in edit mode");
        Self {
            state: FormState::initialize(Some(entity), &defaults),
            definition,
            validation,
            mode: FormMode::Edit { entity_id },
            open: true,
        }
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn values(&self) -> &FormValues {
        self.state.values()
    }

    pub fn errors(&self) -> &ErrorMap {
        self.state.errors()
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_field(&mut self, name: &str, value: Value) -> Result<(), FormError> {
        if !self.open {
            return Err(FormError::Closed);
        }
        self.state.set_field(name, value)?;
        self.state
            .revalidate(&self.validation, &self.definition.sections);
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.open
            && self
                .state
                .can_submit(&self.validation, &self.definition.sections)
    }

    pub fn completion(&self) -> u8 {
        completion_percentage(self.state.values(), &self.definition.sections)
    }

    /// Validate once more and, if clean, mark the form as submitting and hand
    /// out the values. A second call before [`FormSession::finish_submit`]
    /// is rejected as [`SubmitOutcome::Busy`].
    pub fn begin_submit(&mut self) -> SubmitAttempt {
        if !self.open || self.state.is_submitting() {
            debug!("submit ignored: form closed or submit in flight");
            return SubmitAttempt::Rejected(SubmitOutcome::Busy);
        }
        let errors = self
            .validation
            .validate(self.state.values(), &self.definition.sections);
        if let Some((field, message)) = errors.first() {
            let outcome = SubmitOutcome::Invalid {
                field: field.clone(),
                message: message.clone(),
                issues: errors.len(),
            };
            debug!(issues = errors.len(), first = %field, "submit blocked by validation");
            self.state.replace_errors(errors);
            return SubmitAttempt::Rejected(outcome);
        }
        self.state.replace_errors(errors);
        self.state.set_submitting(true);
        SubmitAttempt::Ready {
            values: self.state.values().clone(),
            entity_id: self.mode.entity_id().map(str::to_string),
        }
    }

    /// Second half of the pipeline. Success resets and closes the form;
    /// failure keeps values and errors for another attempt.
    pub fn finish_submit(&mut self, verdict: Result<(), String>) -> SubmitOutcome {
        self.state.set_submitting(false);
        match verdict {
            Ok(()) => {
                info!(mode = ?self.mode, "form submitted");
                self.close();
                SubmitOutcome::Submitted
            }
            Err(reason) => {
                warn!(%reason, "form submission failed");
                SubmitOutcome::Failed { reason }
            }
        }
    }

    /// Run the full pipeline with an injected async submit function. Errors
    /// and panics raised by the function become [`SubmitOutcome::Failed`].
    pub async fn submit<F, Fut, R>(&mut self, submit_fn: F) -> SubmitOutcome
    where
        F: FnOnce(FormValues, Option<String>) -> Fut,
        Fut: Future<Output = R>,
        R: SubmitReply,
    {
        let (values, entity_id) = match self.begin_submit() {
            SubmitAttempt::Ready { values, entity_id } => (values, entity_id),
            SubmitAttempt::Rejected(outcome) => return outcome,
        };
        let verdict = match std::panic::catch_unwind(AssertUnwindSafe(|| {
            submit_fn(values, entity_id)
        })) {
            Ok(future) => AssertUnwindSafe(future)
                .catch_unwind()
                .await
                .map_err(|_| "submit function panicked".to_string())
                .and_then(SubmitReply::into_verdict),
            Err(_) => Err("submit function panicked".to_string()),
        };
        self.finish_submit(verdict)
    }

    /// Close through the dirty-state guard. Refused while a submit is in
    /// flight. Returns whether the form is now closed.
    pub async fn request_close<F, Fut>(&mut self, confirm: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = bool>,
    {
        if !self.open {
            return true;
        }
        if self.state.is_submitting() {
            warn!("close refused while a submit is in flight");
            return false;
        }
        let proceed = guard::request_close(self.state.is_dirty(), confirm).await;
        if proceed {
            self.close();
        } else {
            debug!("close cancelled; keeping unsaved changes");
        }
        proceed
    }

    /// Unconditionally discard state and close.
    pub fn close(&mut self) {
        self.state.reset();
        self.open = false;
        debug!("form closed");
    }
}
