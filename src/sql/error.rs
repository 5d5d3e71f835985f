//! Error types for the SQL data-access layer.

use std::sync::Arc;
use thiserror::Error;

/// Result type for data-access operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised while building or executing SQL statements.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// A clause or statement was requested with arguments that can never
    /// produce valid SQL, such as an empty field mapping.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// An `INSERT ... RETURNING` statement produced no identifier row.
    #[error("insert statement returned no identifier")]
    MissingInsertedId,

    /// A row reported as inserted could not be read back.
    #[error("inserted row {0} could not be read back")]
    InsertedRowMissing(i64),

    /// Connection checkout or statement execution failed in the engine.
    #[error("storage error: {0}")]
    Engine(Arc<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    /// Wraps an engine-level error.
    pub fn engine(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Engine(Arc::new(err))
    }
}
