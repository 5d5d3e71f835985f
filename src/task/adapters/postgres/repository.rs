//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::TaskRow,
    table::{TaskColumn, TasksTable},
};
use crate::sql::{
    FieldMap, PageRequest, PgPool, SharedClock, SqlExecutor, SqlStore, SqlValue,
};
use crate::task::{
    domain::{NewTask, PersistedTaskData, Task, TaskChanges, TaskId, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use mockable::DefaultClock;
use std::sync::Arc;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    store: SqlStore<TasksTable>,
}

impl PostgresTaskRepository {
    /// Creates a repository stamped by the system clock.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::with_clock(pool, Arc::new(DefaultClock))
    }

    /// Creates a repository stamped by the given clock.
    #[must_use]
    pub fn with_clock(pool: PgPool, clock: SharedClock) -> Self {
        Self {
            store: SqlStore::new(SqlExecutor::new(pool), clock),
        }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let row = self
            .store
            .insert(new_task_fields(task))
            .await
            .map_err(TaskRepositoryError::persistence)?;
        row_to_task(row)
    }

    async fn update(
        &self,
        id: TaskId,
        changes: &TaskChanges,
    ) -> TaskRepositoryResult<Option<Task>> {
        let row = self
            .store
            .update(id.value(), &change_fields(changes))
            .await
            .map_err(TaskRepositoryError::persistence)?;
        row.map(row_to_task).transpose()
    }

    async fn soft_delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        self.store
            .soft_delete(id.value())
            .await
            .map_err(TaskRepositoryError::persistence)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let row = self
            .store
            .fetch_one(id.value())
            .await
            .map_err(TaskRepositoryError::persistence)?;
        row.map(row_to_task).transpose()
    }

    async fn find_page(&self, page: PageRequest) -> TaskRepositoryResult<Vec<Task>> {
        self.store
            .fetch_page(page)
            .await
            .map_err(TaskRepositoryError::persistence)?
            .into_iter()
            .map(row_to_task)
            .collect()
    }
}

fn new_task_fields(task: &NewTask) -> FieldMap<TaskColumn> {
    FieldMap::new()
        .with(
            TaskColumn::Title,
            SqlValue::Text(task.title().as_str().to_owned()),
        )
        .with(
            TaskColumn::Description,
            SqlValue::NullableText(task.description().map(str::to_owned)),
        )
        .with(TaskColumn::Deleted, SqlValue::Bool(false))
}

fn change_fields(changes: &TaskChanges) -> FieldMap<TaskColumn> {
    let mut fields = FieldMap::new();
    if let Some(title) = changes.title() {
        fields.set(TaskColumn::Title, SqlValue::Text(title.as_str().to_owned()));
    }
    if let Some(description) = changes.description() {
        fields.set(
            TaskColumn::Description,
            SqlValue::NullableText(description.map(str::to_owned)),
        );
    }
    fields
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        deleted,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::new(id).map_err(TaskRepositoryError::persistence)?,
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        deleted,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
