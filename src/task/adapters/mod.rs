//! Adapter implementations for task ports.
//!
//! - [`memory`]: process-local storage used by tests and storage-free runs
//! - [`postgres`]: `PostgreSQL` storage backed by the generic SQL layer

pub mod memory;
pub mod postgres;
