//! HTTP error mapping.

use crate::task::{
    ports::TaskRepositoryError, services::TaskServiceError, validation::ValidationErrors,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Message returned when the requested page holds no live tasks.
pub const NO_TASKS_MESSAGE: &str = "No tasks found";

/// Message returned for every storage failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Errors surfaced by the task API, each mapped to one status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body or query failed validation.
    #[error("request validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// No live task matches the path identifier. The raw path segment is
    /// kept so unparseable identifiers render the same message.
    #[error("Task with task_id:{0} not found")]
    TaskNotFound(String),

    /// The requested page is empty.
    #[error("No tasks found")]
    NoTasks,

    /// Storage failed; details are logged, never returned.
    #[error("Internal server error")]
    Internal(#[source] TaskRepositoryError),
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::NotFound(id) => Self::TaskNotFound(id.to_string()),
            TaskServiceError::Repository(source) => Self::Internal(source),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => {
                warn!(%errors, "rejected request");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": errors.errors() })),
                )
                    .into_response()
            }
            Self::TaskNotFound(_) | Self::NoTasks => {
                let message = self.to_string();
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            Self::Internal(source) => {
                error!(error = %source, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}
