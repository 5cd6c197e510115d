//! Form domain layer
//!
//! Schema, field values, validation and the state store for the survey form.

mod field;
mod form_state;
mod schema;
mod validation;

pub use field::FormField;
pub use form_state::{Form, FormStateStore, FormValues};
pub use schema::{active_fields, FieldName, FormError, Topic, MIN_FEEDBACK_CHARS};
pub use validation::{validate, ErrorMap};
