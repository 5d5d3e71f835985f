//! Generic SQL data-access layer.
//!
//! The layer owns all SQL text and parameter binding. Callers describe a
//! table once through [`SqlTable`] and then pass typed [`FieldMap`]s of
//! columns and values; they never assemble SQL fragments themselves.
//!
//! - [`clause`]: parametrized `SET`, `WHERE`, and `INSERT` fragments
//! - [`executor`]: per-call connection checkout and statement execution
//! - [`store`]: insert, update, soft delete, and fetch operations
//! - [`page`]: page-number pagination

pub mod clause;
pub mod error;
pub mod executor;
pub mod page;
pub mod store;
pub mod value;

pub use clause::{Clause, InsertClause, Placeholders};
pub use error::{StorageError, StorageResult};
pub use executor::{PgPool, SqlExecutor, Statement, StatementOutcome, connect_pool};
pub use page::PageRequest;
pub use store::{SharedClock, SqlStore, SqlTable};
pub use value::{FieldMap, SqlColumn, SqlValue};
