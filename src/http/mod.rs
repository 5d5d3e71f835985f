//! HTTP surface of the task API.
//!
//! Every response body is JSON: `{"data": ...}` on success and
//! `{"error": ...}` on failure, except `204 No Content` after a delete.
//! Validation errors are a list of `{location, message}` objects; every
//! other error is a single message string.

mod error;
mod handlers;
mod pagination;
mod routes;

pub use error::{ApiError, INTERNAL_ERROR_MESSAGE, NO_TASKS_MESSAGE};
pub use handlers::{DataResponse, SharedTaskService};
pub use pagination::PageParams;
pub use routes::router;
