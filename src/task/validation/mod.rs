//! Validation of untrusted task input.
//!
//! Request bodies arrive as arbitrary JSON. The functions here check them
//! against the task schema, collect every field error, and only then
//! produce the domain inputs ([`NewTask`](crate::task::domain::NewTask) and
//! [`TaskChanges`](crate::task::domain::TaskChanges)).

mod error;
mod payload;
pub mod rules;

pub use error::{FieldError, ValidationErrors};
pub use payload::{parse_json_body, parse_new_task, parse_task_changes};
