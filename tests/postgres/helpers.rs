//! Shared helpers for `PostgreSQL` integration tests.

use super::cluster::{BoxError, PostgresCluster, TemporaryDatabase};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use mockable::Clock;
use std::sync::{Arc, Mutex};
use taskdesk::sql::{PgPool, SharedClock, connect_pool};
use uuid::Uuid;

pub use super::cluster::postgres_cluster;

/// SQL creating the `tasks` table.
pub const CREATE_TASKS_SQL: &str =
    include_str!("../../migrations/2026-10-19-000000_create_tasks/up.sql");

/// Template database holding the migrated schema.
pub const TEMPLATE_DB: &str = "taskdesk_test_template";

/// A migrated database owned by one test, with a pool over it.
pub struct TestDatabase {
    pool: PgPool,
    _database: TemporaryDatabase,
}

impl TestDatabase {
    /// Returns a pool connected to this database.
    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }
}

fn apply_migrations(url: &str) -> Result<(), BoxError> {
    let mut conn = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
    conn.batch_execute(CREATE_TASKS_SQL)
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok(())
}

/// Creates a fresh database with an empty `tasks` table.
///
/// # Errors
///
/// Returns an error when the template, the database, or the pool cannot be
/// set up.
pub fn test_database(cluster: PostgresCluster) -> eyre::Result<TestDatabase> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, apply_migrations)
        .map_err(|err| eyre::eyre!(err))?;
    let database = cluster
        .temporary_database_from_template(&format!("test_{}", Uuid::new_v4().simple()), TEMPLATE_DB)
        .map_err(|err| eyre::eyre!(err))?;
    let pool = connect_pool(&database.url(), 2)?;
    Ok(TestDatabase {
        pool,
        _database: database,
    })
}

/// Clock that moves by a fixed step on every reading.
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().expect("clock lock");
        let current = *next;
        *next = current + self.step;
        current
    }
}

/// Start time of [`stepping_clock`] and [`rewinding_clock`].
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Returns a shared clock starting at [`epoch`] and advancing one second
/// per reading.
pub fn stepping_clock() -> SharedClock {
    Arc::new(SteppingClock {
        next: Mutex::new(epoch()),
        step: Duration::seconds(1),
    })
}

/// Returns a shared clock starting at [`epoch`] and falling back one hour
/// per reading, as a host clock does after a large correction.
pub fn rewinding_clock() -> SharedClock {
    Arc::new(SteppingClock {
        next: Mutex::new(epoch()),
        step: Duration::hours(-1),
    })
}
