//! Repository port for task persistence and lookup.

use crate::sql::PageRequest;
use crate::task::domain::{NewTask, Task, TaskChanges, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Soft-deleted tasks are invisible to every operation: lookups return
/// `None`, updates return `None`, and deletes return `false`. These absent
/// outcomes are not errors.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task, assigning its identifier and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when storage fails.
    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<Task>;

    /// Merges `changes` into the live task and refreshes `updated_at`.
    ///
    /// Returns `None` when no live task has the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when storage fails.
    async fn update(&self, id: TaskId, changes: &TaskChanges)
    -> TaskRepositoryResult<Option<Task>>;

    /// Soft-deletes the live task.
    ///
    /// Returns `false` when no live task has the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when storage fails.
    async fn soft_delete(&self, id: TaskId) -> TaskRepositoryResult<bool>;

    /// Finds a live task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when storage fails.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns one page of live tasks in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when storage fails.
    async fn find_page(&self, page: PageRequest) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
