//! Router assembly.

use super::handlers::{
    SharedTaskService, create_task, delete_task, get_task, health, list_tasks, update_task,
};
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

/// Builds the application router.
///
/// Task routes answer with and without a trailing slash.
pub fn router(service: SharedTaskService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route(
            "/tasks/{id}/",
            get(get_task).put(update_task).delete(delete_task),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
