//! In-memory task repository for tests and storage-free runs.

use crate::sql::{PageRequest, SharedClock};
use crate::task::{
    domain::{NewTask, Task, TaskChanges, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use mockable::DefaultClock;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory task repository.
///
/// Mirrors the `PostgreSQL` adapter: identifiers increase from one and are
/// never reused, deleted tasks stay stored with their flag set, and pages
/// follow identifier order.
#[derive(Clone)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
    clock: SharedClock,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    last_id: i64,
    tasks: BTreeMap<TaskId, Task>,
}

impl InMemoryTaskRepository {
    /// Creates an empty repository stamped by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Creates an empty repository stamped by the given clock.
    #[must_use]
    pub fn with_clock(clock: SharedClock) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTaskState::default())),
            clock,
        }
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryTaskRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTaskRepository")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn live_task_mut(state: &mut InMemoryTaskState, id: TaskId) -> Option<&mut Task> {
    state.tasks.get_mut(&id).filter(|task| !task.is_deleted())
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let now = self.clock.utc();
        let mut state = self.write()?;
        let next = state.last_id + 1;
        let id = TaskId::new(next).map_err(TaskRepositoryError::persistence)?;
        let stored = Task::inserted(id, task.clone(), now);
        state.last_id = next;
        state.tasks.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: TaskId,
        changes: &TaskChanges,
    ) -> TaskRepositoryResult<Option<Task>> {
        let now = self.clock.utc();
        let mut state = self.write()?;
        Ok(live_task_mut(&mut state, id).map(|task| {
            task.apply(changes, now);
            task.clone()
        }))
    }

    async fn soft_delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let now = self.clock.utc();
        let mut state = self.write()?;
        Ok(live_task_mut(&mut state, id)
            .map(|task| task.mark_deleted(now))
            .is_some())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .get(&id)
            .filter(|task| !task.is_deleted())
            .cloned())
    }

    async fn find_page(&self, page: PageRequest) -> TaskRepositoryResult<Vec<Task>> {
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| !task.is_deleted())
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }
}
