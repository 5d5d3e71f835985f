//! Domain model for task records.
//!
//! The task domain holds validated identifiers and titles plus the task
//! record itself, keeping all storage and transport concerns outside of the
//! domain boundary.

mod error;
mod ids;
mod task;

pub use error::TaskDomainError;
pub use ids::{TaskId, TaskTitle};
pub use task::{NewTask, PersistedTaskData, Task, TaskChanges};
