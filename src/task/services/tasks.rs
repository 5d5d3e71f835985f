//! Service layer for task creation, retrieval, update, and deletion.

use crate::sql::PageRequest;
use crate::task::{
    domain::{NewTask, Task, TaskChanges, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// No live task has the identifier. Never-created and already-deleted
    /// tasks are indistinguishable.
    #[error("Task with task_id:{0} not found")]
    NotFound(TaskId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task orchestration service.
///
/// Turns the repository's absent outcomes (`None`, `false`) into
/// [`TaskServiceError::NotFound`] so callers branch on one error type.
pub struct TaskService<R>
where
    R: TaskRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> Clone for TaskService<R>
where
    R: TaskRepository + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> TaskService<R>
where
    R: TaskRepository + ?Sized,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when persistence fails.
    pub async fn create(&self, draft: NewTask) -> TaskServiceResult<Task> {
        let task = self.repository.insert(&draft).await?;
        info!(task_id = %task.id(), "task created");
        Ok(task)
    }

    /// Retrieves a live task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when no live task has the
    /// identifier, or [`TaskServiceError::Repository`] when lookup fails.
    pub async fn get(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.repository.find_by_id(id).await?.ok_or_else(|| {
            warn!(task_id = %id, "task not found");
            TaskServiceError::NotFound(id)
        })
    }

    /// Lists one page of live tasks. An empty page is a normal outcome.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when lookup fails.
    pub async fn list(&self, page: PageRequest) -> TaskServiceResult<Vec<Task>> {
        let tasks = self.repository.find_page(page).await?;
        info!(
            page = page.page(),
            limit = page.limit(),
            count = tasks.len(),
            "listed tasks"
        );
        Ok(tasks)
    }

    /// Applies a partial update to a live task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when no live task has the
    /// identifier, or [`TaskServiceError::Repository`] when persistence
    /// fails.
    pub async fn update(&self, id: TaskId, changes: &TaskChanges) -> TaskServiceResult<Task> {
        let updated = self.repository.update(id, changes).await?.ok_or_else(|| {
            warn!(task_id = %id, "task not found for update");
            TaskServiceError::NotFound(id)
        })?;
        info!(task_id = %id, "task updated");
        Ok(updated)
    }

    /// Soft-deletes a live task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when no live task has the
    /// identifier, or [`TaskServiceError::Repository`] when persistence
    /// fails.
    pub async fn delete(&self, id: TaskId) -> TaskServiceResult<()> {
        if !self.repository.soft_delete(id).await? {
            warn!(task_id = %id, "task not found for deletion");
            return Err(TaskServiceError::NotFound(id));
        }
        info!(task_id = %id, "task deleted");
        Ok(())
    }
}
