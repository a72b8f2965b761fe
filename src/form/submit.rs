use std::fmt::Display;

use super::value::FormValues;

/// What an injected submit function may resolve to. `()` and `true` mean
/// success; `false` or an `Err` mean failure.
pub trait SubmitReply {
    fn into_verdict(self) -> Result<(), String>;
}

impl SubmitReply for () {
    fn into_verdict(self) -> Result<(), String> {
        Ok(())
    }
}

impl SubmitReply for bool {
    fn into_verdict(self) -> Result<(), String> {
        if self {
            Ok(())
        } else {
            Err("submission was rejected".to_string())
        }
    }
}

impl<T, E> SubmitReply for Result<T, E>
where
    T: SubmitReply,
    E: Display,
{
    fn into_verdict(self) -> Result<(), String> {
        match self {
            Ok(reply) => reply.into_verdict(),
            Err(err) => Err(err.to_string()),
        }
    }
}

/// Terminal result of one submit attempt. Nothing is retried automatically.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The submit function accepted the values; the form was reset and closed.
    Submitted,
    /// Validation failed; the submit function was not called. `field` and
    /// `message` are the first violation in schema order.
    Invalid {
        field: String,
        message: String,
        issues: usize,
    },
    /// The submit function returned `false`, an error, or panicked. Values and
    /// errors are left as they were.
    Failed { reason: String },
    /// Another submit is already in flight, or the form is closed.
    Busy,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }
}

/// First half of the pipeline: either a snapshot ready to hand to the submit
/// function, or the reason it must not be called.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitAttempt {
    Ready {
        values: FormValues,
        entity_id: Option<String>,
    },
    Rejected(SubmitOutcome),
}
