use std::cmp::Ordering;

use serde_json::Value;

use super::{ErrorMap, rules::{parse_date, parse_time}};
use crate::domain::SectionSchema;
use crate::form::{
    path,
    value::{FormValues, is_blank, parse_number, value_to_string},
};

/// Entity-specific rule that runs after the generic per-field pass. It may
/// add entries or replace the generic message for a field. `sections` is the
/// form being validated, for validators that need labels or options.
pub trait CustomValidator: Send + Sync {
    fn check(&self, values: &FormValues, sections: &[SectionSchema], errors: &mut ErrorMap);
}

impl<F> CustomValidator for F
where
    F: Fn(&FormValues, &mut ErrorMap) + Send + Sync,
{
    fn check(&self, values: &FormValues, _sections: &[SectionSchema], errors: &mut ErrorMap) {
        self(values, errors)
    }
}

/// Rejects a value that already exists among the caller's other entities,
/// e.g. a plan or category name. Comparison ignores case and surrounding
/// whitespace. In edit mode the entity's own current value is not a clash.
#[derive(Debug, Clone)]
pub struct UniqueValue {
    field: String,
    existing: Vec<String>,
    current: Option<String>,
    message: String,
}

impl UniqueValue {
    pub fn new(field: impl Into<String>, existing: impl IntoIterator<Item = String>) -> Self {
        Self {
            field: field.into(),
            existing: existing.into_iter().map(|item| normalize(&item)).collect(),
            current: None,
            message: "This value is already in use".to_string(),
        }
    }

    pub fn editing(mut self, current: impl AsRef<str>) -> Self {
        self.current = Some(normalize(current.as_ref()));
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl CustomValidator for UniqueValue {
    fn check(&self, values: &FormValues, _sections: &[SectionSchema], errors: &mut ErrorMap) {
        let value = path::lookup(values, &self.field);
        if is_blank(value) {
            return;
        }
        let candidate = normalize(&value.map(value_to_string).unwrap_or_default());
        if self.current.as_deref() == Some(candidate.as_str()) {
            return;
        }
        if self.existing.iter().any(|item| *item == candidate) {
            errors.insert(self.field.clone(), self.message.clone());
        }
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    Date,
    Time,
    Number,
}

/// Cross-field ordering: `upper >= lower`, inclusive. The error is attached to
/// the upper field. Blank or unparseable sides are left to the generic pass.
#[derive(Debug, Clone)]
pub struct OrderedPair {
    lower: String,
    upper: String,
    kind: OrderKind,
    message: Option<String>,
}

impl OrderedPair {
    pub fn new(lower: impl Into<String>, upper: impl Into<String>, kind: OrderKind) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
            kind,
            message: None,
        }
    }

    pub fn dates(lower: impl Into<String>, upper: impl Into<String>) -> Self {
        Self::new(lower, upper, OrderKind::Date)
    }

    pub fn numbers(lower: impl Into<String>, upper: impl Into<String>) -> Self {
        Self::new(lower, upper, OrderKind::Number)
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn compare(&self, lower: &Value, upper: &Value) -> Option<Ordering> {
        match self.kind {
            OrderKind::Date => {
                let parse = |value: &Value| parse_date(value.as_str()?.trim());
                Some(parse(upper)?.cmp(&parse(lower)?))
            }
            OrderKind::Time => {
                let parse = |value: &Value| parse_time(value.as_str()?.trim());
                Some(parse(upper)?.cmp(&parse(lower)?))
            }
            OrderKind::Number => parse_number(upper)?.partial_cmp(&parse_number(lower)?),
        }
    }
}

impl CustomValidator for OrderedPair {
    fn check(&self, values: &FormValues, sections: &[SectionSchema], errors: &mut ErrorMap) {
        let (Some(lower), Some(upper)) = (
            path::lookup(values, &self.lower),
            path::lookup(values, &self.upper),
        ) else {
            return;
        };
        if is_blank(Some(lower)) || is_blank(Some(upper)) {
            return;
        }
        if self.compare(lower, upper) == Some(Ordering::Less) {
            let message = self
                .message
                .clone()
                .unwrap_or_else(|| {
                    let lower = sections
                        .iter()
                        .flat_map(|section| section.fields.iter())
                        .find(|field| field.name == self.lower)
                        .map_or(self.lower.as_str(), |field| field.label.as_str());
                    format!("Must not be earlier than {lower}")
                });
            errors.insert(self.upper.clone(), message);
        }
    }
}
