//! Taskdesk: a REST API for task records over a generic SQL layer.
//!
//! Tasks are created, listed page by page, partially updated, and
//! soft-deleted. Persistence goes through a small data-access layer that
//! builds parametrized SQL from typed column maps and runs every statement
//! on a pooled connection.
//!
//! # Architecture
//!
//! Taskdesk follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (`PostgreSQL`, memory)
//!
//! # Modules
//!
//! - [`sql`]: Clause builder, statement executor, and CRUD store
//! - [`task`]: Task domain, repository port and adapters, service
//! - [`http`]: Axum router mapping service outcomes to status codes
//! - [`config`]: Command-line and environment configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod http;
pub mod sql;
pub mod task;
pub mod telemetry;
