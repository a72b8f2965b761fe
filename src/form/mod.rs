mod error;
mod guard;
pub mod path;
mod progress;
mod session;
mod state;
mod submit;
mod validation;
mod value;

pub use error::FormError;
pub use guard::request_close;
pub use progress::completion_percentage;
pub use session::{FormMode, FormSession};
pub use state::{FormState, FormStatus};
pub use submit::{SubmitAttempt, SubmitOutcome, SubmitReply};
pub use validation::{
    CustomValidator, ErrorMap, OrderKind, OrderedPair, UniqueValue, ValidationSchema, validate,
};
pub use value::{FormValues, deep_merge, defaults_for, is_blank, parse_number, value_to_string};
