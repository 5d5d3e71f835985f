//! Task records and their CRUD lifecycle.
//!
//! Tasks are created, read, paged, partially updated, and soft-deleted.
//! Deleted tasks stay stored with their flag set but are invisible to every
//! read and write. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Untrusted input checks in [`validation`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod validation;
