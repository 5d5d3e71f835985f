//! `PostgreSQL` adapters for task persistence.

mod models;
mod repository;
mod table;

pub use models::TaskRow;
pub use repository::PostgresTaskRepository;
pub use table::{TaskColumn, TasksTable};
