//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is not a positive integer.
    #[error("invalid task identifier {0}, expected a positive integer")]
    InvalidTaskId(i64),

    /// The task identifier could not be parsed as an integer.
    #[error("task identifier '{0}' is not an integer")]
    UnparseableTaskId(String),

    /// The title is empty after trimming.
    #[error("Title must not be empty")]
    EmptyTitle,

    /// The title exceeds the persisted column width.
    #[error("ensure this value has at most {max} characters")]
    TitleTooLong {
        /// Maximum accepted character count.
        max: usize,
        /// Character count of the rejected title.
        actual: usize,
    },
}
