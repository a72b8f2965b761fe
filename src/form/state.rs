use serde_json::Value;

use crate::domain::SectionSchema;

use super::{
    error::FormError,
    path,
    validation::{ErrorMap, ValidationSchema},
    value::{FormValues, deep_merge},
};

/// Coarse lifecycle of one form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Dirty,
    Submitting,
}

/// Values, errors and the dirty/submitting flags of one in-progress form.
/// Every value mutation goes through [`FormState::set_field`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: FormValues,
    errors: ErrorMap,
    dirty: bool,
    submitting: bool,
}

impl FormState {
    /// Start from `defaults` (add mode) or from `entity` deep-merged over
    /// `defaults` (edit mode), so properties the entity lacks fall back.
    pub fn initialize(entity: Option<&Value>, defaults: &FormValues) -> Self {
        let values = match entity {
            Some(entity) => {
                let mut merged = Value::Object(defaults.clone());
                deep_merge(&mut merged, entity);
                match merged {
                    Value::Object(map) => map,
                    other => {
                        tracing::warn!(entity = %other, "edit entity is not an object; using defaults");
                        defaults.clone()
                    }
                }
            }
            None => defaults.clone(),
        };
        Self {
            values,
            ..Self::default()
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        path::lookup(&self.values, name)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn status(&self) -> FormStatus {
        if self.submitting {
            FormStatus::Submitting
        } else if self.dirty {
            FormStatus::Dirty
        } else {
            FormStatus::Idle
        }
    }

    /// Write one field and mark the form dirty. Validation is left to the
    /// caller (see [`FormState::revalidate`]).
    pub fn set_field(&mut self, name: &str, value: Value) -> Result<(), FormError> {
        path::assign(&mut self.values, name, value)?;
        self.dirty = true;
        Ok(())
    }

    /// Recompute the error map from scratch, but only once the form is dirty.
    pub fn revalidate(&mut self, schema: &ValidationSchema, sections: &[SectionSchema]) {
        if self.dirty {
            self.errors = schema.validate(&self.values, sections);
        }
    }

    pub fn replace_errors(&mut self, errors: ErrorMap) {
        self.errors = errors;
    }

    /// No errors, at least one change, and no submit in flight. A pristine
    /// form is never submittable, even if its defaults are valid.
    pub fn can_submit(&self, schema: &ValidationSchema, sections: &[SectionSchema]) -> bool {
        self.dirty && !self.submitting && schema.validate(&self.values, sections).is_empty()
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    /// Back to the empty state used when a form is closed.
    pub fn reset(&mut self) {
        self.values.clear();
        self.errors.clear();
        self.dirty = false;
    }
}
