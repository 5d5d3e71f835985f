//! Connection checkout and single-statement execution.

use super::error::{StorageError, StorageResult};
use super::value::SqlValue;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::BigInt;
use tracing::{debug, error};

/// `PostgreSQL` connection pool shared by every store.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a pool of at most `max_size` connections to `database_url`.
///
/// # Errors
///
/// Returns [`StorageError::Engine`] when the initial connections cannot be
/// established.
pub fn connect_pool(database_url: &str, max_size: u32) -> StorageResult<PgPool> {
    Pool::builder()
        .max_size(max_size)
        .build(ConnectionManager::<PgConnection>::new(database_url))
        .map_err(StorageError::engine)
}

/// Column alias used by `INSERT ... RETURNING` statements.
pub const INSERTED_ID_ALIAS: &str = "inserted_id";

/// SQL text plus the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: String,
    binds: Vec<SqlValue>,
}

impl Statement {
    /// Creates a statement from SQL text and ordered bind values.
    #[must_use]
    pub fn new(sql: impl Into<String>, binds: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            binds,
        }
    }

    /// Returns the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the bind values in placeholder order.
    #[must_use]
    pub fn binds(&self) -> &[SqlValue] {
        &self.binds
    }

    fn into_query(self) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
        self.binds
            .into_iter()
            .fold(diesel::sql_query(self.sql).into_boxed::<Pg>(), |query, value| {
                value.bind_to(query)
            })
    }
}

/// Result handle for one executed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementOutcome<R> {
    affected_rows: usize,
    last_insert_id: Option<i64>,
    rows: Vec<R>,
}

impl<R> StatementOutcome<R> {
    /// Number of rows written, or returned for fetches.
    #[must_use]
    pub const fn affected_rows(&self) -> usize {
        self.affected_rows
    }

    /// Identifier generated by an insert, if any.
    #[must_use]
    pub const fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }

    /// Identifier generated by an insert, required to be present.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MissingInsertedId`] when the statement
    /// produced no identifier row.
    pub const fn require_insert_id(&self) -> StorageResult<i64> {
        match self.last_insert_id {
            Some(id) => Ok(id),
            None => Err(StorageError::MissingInsertedId),
        }
    }

    /// Consumes the outcome, yielding fetched rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

#[derive(Debug, QueryableByName)]
struct InsertedId {
    #[diesel(sql_type = BigInt)]
    inserted_id: i64,
}

/// Runs statements against pooled connections.
///
/// Each call checks out exactly one connection, runs one statement inside
/// its own transaction, and returns the connection to the pool when the
/// checkout guard drops, on success and failure alike.
#[derive(Debug, Clone)]
pub struct SqlExecutor {
    pool: PgPool,
}

impl SqlExecutor {
    /// Creates an executor over a shared pool handle.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Executes a write statement and reports the affected row count.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Engine`] when checkout or execution fails.
    pub async fn execute(&self, statement: Statement) -> StorageResult<StatementOutcome<()>> {
        let affected_rows = self
            .run_blocking(statement, |connection, query| query.execute(connection))
            .await?;
        Ok(StatementOutcome {
            affected_rows,
            last_insert_id: None,
            rows: Vec::new(),
        })
    }

    /// Executes an `INSERT ... RETURNING <id> AS inserted_id` statement.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Engine`] when checkout or execution fails.
    pub async fn insert(&self, statement: Statement) -> StorageResult<StatementOutcome<()>> {
        let inserted = self
            .run_blocking(statement, |connection, query| {
                query.load::<InsertedId>(connection)
            })
            .await?;
        Ok(StatementOutcome {
            affected_rows: inserted.len(),
            last_insert_id: inserted.last().map(|row| row.inserted_id),
            rows: Vec::new(),
        })
    }

    /// Executes a `SELECT` and collects its rows.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Engine`] when checkout or execution fails.
    pub async fn fetch<R>(&self, statement: Statement) -> StorageResult<StatementOutcome<R>>
    where
        R: QueryableByName<Pg> + Send + 'static,
    {
        let rows = self
            .run_blocking(statement, |connection, query| query.load::<R>(connection))
            .await?;
        Ok(StatementOutcome {
            affected_rows: rows.len(),
            last_insert_id: None,
            rows,
        })
    }

    async fn run_blocking<F, T>(&self, statement: Statement, op: F) -> StorageResult<T>
    where
        F: FnOnce(&mut PgConnection, BoxedSqlQuery<'static, Pg, SqlQuery>) -> QueryResult<T>
            + Send
            + 'static,
        T: Send + 'static,
    {
        debug!(
            sql = statement.sql(),
            binds = statement.binds().len(),
            "executing statement"
        );
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let sql = statement.sql().to_owned();
            let mut pooled = pool.get().map_err(|err| {
                error!(error = %err, "connection checkout failed");
                StorageError::engine(err)
            })?;
            let connection: &mut PgConnection = &mut pooled;
            connection
                .transaction(|conn| op(conn, statement.into_query()))
                .map_err(|err| {
                    error!(error = %err, %sql, "statement failed");
                    StorageError::engine(err)
                })
        })
        .await
        .map_err(StorageError::engine)?
    }
}
