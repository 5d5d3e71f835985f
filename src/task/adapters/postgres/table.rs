//! Column set and table description of the `tasks` table.

use super::models::TaskRow;
use crate::sql::{SqlColumn, SqlTable};

/// Columns of the `tasks` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskColumn {
    /// `id`
    Id,
    /// `title`
    Title,
    /// `description`
    Description,
    /// `deleted`
    Deleted,
    /// `created_at`
    CreatedAt,
    /// `updated_at`
    UpdatedAt,
}

impl SqlColumn for TaskColumn {
    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Description => "description",
            Self::Deleted => "deleted",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Marker type describing the `tasks` table to the SQL layer.
#[derive(Debug, Clone, Copy)]
pub struct TasksTable;

impl SqlTable for TasksTable {
    type Column = TaskColumn;
    type Row = TaskRow;

    const NAME: &'static str = "tasks";
    const ID: TaskColumn = TaskColumn::Id;
    const DELETED: TaskColumn = TaskColumn::Deleted;
    const CREATED_AT: TaskColumn = TaskColumn::CreatedAt;
    const UPDATED_AT: TaskColumn = TaskColumn::UpdatedAt;

    fn columns() -> &'static [TaskColumn] {
        &[
            TaskColumn::Id,
            TaskColumn::Title,
            TaskColumn::Description,
            TaskColumn::Deleted,
            TaskColumn::CreatedAt,
            TaskColumn::UpdatedAt,
        ]
    }
}
