//! Request handlers for the task routes.

use super::{error::ApiError, pagination::PageParams};
use crate::task::{
    domain::{Task, TaskId},
    ports::TaskRepository,
    services::TaskService,
    validation::{parse_json_body, parse_new_task, parse_task_changes},
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

/// Service shared by every handler, erased over its repository.
pub type SharedTaskService = TaskService<dyn TaskRepository>;

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    data: T,
}

impl<T> DataResponse<T> {
    const fn new(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn parse_task_id(raw: &str) -> ApiResult<TaskId> {
    raw.parse()
        .map_err(|_| ApiError::TaskNotFound(raw.to_owned()))
}

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(super) async fn list_tasks(
    State(service): State<SharedTaskService>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<DataResponse<Vec<Task>>>> {
    let params = query.map(|Query(params)| params).unwrap_or_else(|rejection| {
        warn!(%rejection, "unreadable query string, using default page");
        PageParams::default()
    });
    let page = params.to_page_request()?;
    info!(page = page.page(), limit = page.limit(), "listing tasks");

    let tasks = service.list(page).await?;
    if tasks.is_empty() {
        return Err(ApiError::NoTasks);
    }
    Ok(DataResponse::new(tasks))
}

pub(super) async fn get_task(
    State(service): State<SharedTaskService>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<DataResponse<Task>>> {
    info!(task_id = %raw_id, "fetching task");
    let id = parse_task_id(&raw_id)?;
    let task = service.get(id).await?;
    Ok(DataResponse::new(task))
}

pub(super) async fn create_task(
    State(service): State<SharedTaskService>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<DataResponse<Task>>)> {
    info!("creating task");
    let draft = parse_new_task(&parse_json_body(&body)?)?;
    let task = service.create(draft).await?;
    Ok((StatusCode::CREATED, DataResponse::new(task)))
}

pub(super) async fn update_task(
    State(service): State<SharedTaskService>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<DataResponse<Task>>> {
    info!(task_id = %raw_id, "updating task");
    let changes = parse_task_changes(&parse_json_body(&body)?)?;
    let id = parse_task_id(&raw_id)?;
    let task = service.update(id, &changes).await?;
    Ok(DataResponse::new(task))
}

pub(super) async fn delete_task(
    State(service): State<SharedTaskService>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    info!(task_id = %raw_id, "deleting task");
    let id = parse_task_id(&raw_id)?;
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
