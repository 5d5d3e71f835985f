//! Generic CRUD operations over a soft-deletable table.

use super::clause::{Placeholders, assignment_clause, filter_clause, insert_clause};
use super::error::{StorageError, StorageResult};
use super::executor::{INSERTED_ID_ALIAS, SqlExecutor, Statement};
use super::page::PageRequest;
use super::value::{FieldMap, SqlColumn, SqlValue};
use chrono::{DateTime, Utc};
use diesel::QueryableByName;
use diesel::pg::Pg;
use mockable::Clock;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Shared clock handle used to stamp row timestamps.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// Describes a table with a surrogate `BIGINT` key, a soft-delete flag, and
/// creation and update timestamps.
pub trait SqlTable: Send + Sync + 'static {
    /// Column identifiers of the table.
    type Column: SqlColumn;
    /// Row type produced by `SELECT` statements.
    type Row: QueryableByName<Pg> + Send + 'static;

    /// Table name.
    const NAME: &'static str;
    /// Surrogate primary key column.
    const ID: Self::Column;
    /// Soft-delete flag column.
    const DELETED: Self::Column;
    /// Creation timestamp column.
    const CREATED_AT: Self::Column;
    /// Last-update timestamp column.
    const UPDATED_AT: Self::Column;

    /// Columns selected when reading rows, in the order the row type expects.
    fn columns() -> &'static [Self::Column];
}

/// CRUD facade for one [`SqlTable`].
///
/// Every operation builds one parametrized statement and hands it to the
/// [`SqlExecutor`]. Rows whose soft-delete flag is set are invisible to all
/// operations.
pub struct SqlStore<T: SqlTable> {
    executor: SqlExecutor,
    clock: SharedClock,
    table: PhantomData<fn() -> T>,
}

impl<T: SqlTable> Clone for SqlStore<T> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            clock: Arc::clone(&self.clock),
            table: PhantomData,
        }
    }
}

impl<T: SqlTable> std::fmt::Debug for SqlStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlStore")
            .field("table", &T::NAME)
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl<T: SqlTable> SqlStore<T> {
    /// Creates a store over an executor and a clock.
    #[must_use]
    pub fn new(executor: SqlExecutor, clock: SharedClock) -> Self {
        Self {
            executor,
            clock,
            table: PhantomData,
        }
    }

    /// Inserts a row and reads it back by its generated identifier.
    ///
    /// `created_at` and `updated_at` are stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidArgument`] when `fields` is empty or
    /// names a storage-managed column, [`StorageError::MissingInsertedId`]
    /// when the engine returns no identifier,
    /// [`StorageError::InsertedRowMissing`] when the new row cannot be read
    /// back, and [`StorageError::Engine`] on engine failure.
    pub async fn insert(&self, fields: FieldMap<T::Column>) -> StorageResult<T::Row> {
        let statement = insert_statement::<T>(fields, self.clock.utc())?;
        let outcome = self.executor.insert(statement).await?;
        let id = outcome.require_insert_id()?;
        debug!(table = T::NAME, id, "row inserted");

        self.fetch_one(id)
            .await?
            .ok_or(StorageError::InsertedRowMissing(id))
    }

    /// Applies a partial update to a live row and reads it back.
    ///
    /// `updated_at` is stamped with the current time, never earlier than
    /// `created_at`. An empty `fields` map only refreshes `updated_at`.
    /// Returns `None` when no live row has the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidArgument`] when `fields` names a
    /// storage-managed column and [`StorageError::Engine`] on engine failure.
    pub async fn update(
        &self,
        id: i64,
        fields: &FieldMap<T::Column>,
    ) -> StorageResult<Option<T::Row>> {
        let statement = update_statement::<T>(fields, id, self.clock.utc())?;
        let affected = self.executor.execute(statement).await?.affected_rows();
        if affected == 0 {
            debug!(table = T::NAME, id, "update matched no live row");
            return Ok(None);
        }
        self.fetch_one(id).await
    }

    /// Marks a live row as deleted.
    ///
    /// Returns `true` when a row changed, `false` when no live row has the
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Engine`] on engine failure.
    pub async fn soft_delete(&self, id: i64) -> StorageResult<bool> {
        let statement = soft_delete_statement::<T>(id, self.clock.utc())?;
        let affected = self.executor.execute(statement).await?.affected_rows();
        Ok(affected > 0)
    }

    /// Fetches the live row with the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Engine`] on engine failure.
    pub async fn fetch_one(&self, id: i64) -> StorageResult<Option<T::Row>> {
        let outcome = self
            .executor
            .fetch::<T::Row>(select_one_statement::<T>(id)?)
            .await?;
        Ok(outcome.into_rows().into_iter().next())
    }

    /// Fetches one page of live rows in insertion order.
    ///
    /// A page whose offset lies beyond the `BIGINT` range cannot hold any
    /// row and comes back empty without touching the database.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Engine`] on engine failure.
    pub async fn fetch_page(&self, page: PageRequest) -> StorageResult<Vec<T::Row>> {
        let Some(statement) = page_statement::<T>(page)? else {
            debug!(table = T::NAME, offset = page.offset(), "page lies past the last row");
            return Ok(Vec::new());
        };
        let outcome = self.executor.fetch::<T::Row>(statement).await?;
        Ok(outcome.into_rows())
    }
}

/// Builds `INSERT ... RETURNING <id> AS inserted_id` with both timestamps
/// set to `now`.
fn insert_statement<T: SqlTable>(
    fields: FieldMap<T::Column>,
    now: DateTime<Utc>,
) -> StorageResult<Statement> {
    reject_managed_columns::<T>(&fields)?;
    if fields.is_empty() {
        return Err(StorageError::InvalidArgument(
            "insert requires at least one field",
        ));
    }
    let stamped = fields
        .with(T::CREATED_AT, SqlValue::Timestamp(now))
        .with(T::UPDATED_AT, SqlValue::Timestamp(now));

    let mut placeholders = Placeholders::new();
    let clause = insert_clause(&stamped, &mut placeholders)?;
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {} AS {INSERTED_ID_ALIAS}",
        T::NAME,
        clause.columns,
        clause.values,
        T::ID.name(),
    );
    Ok(Statement::new(sql, clause.binds))
}

/// Builds `UPDATE ... SET <fields>, updated_at = GREATEST($n, created_at)`
/// restricted to the live row `id`.
fn update_statement<T: SqlTable>(
    fields: &FieldMap<T::Column>,
    id: i64,
    now: DateTime<Utc>,
) -> StorageResult<Statement> {
    reject_managed_columns::<T>(fields)?;
    touching_update::<T>(fields, id, now)
}

/// Builds the update that sets the soft-delete flag on the live row `id`.
fn soft_delete_statement<T: SqlTable>(id: i64, now: DateTime<Utc>) -> StorageResult<Statement> {
    let fields = FieldMap::new().with(T::DELETED, SqlValue::Bool(true));
    touching_update::<T>(&fields, id, now)
}

fn select_one_statement<T: SqlTable>(id: i64) -> StorageResult<Statement> {
    let mut placeholders = Placeholders::new();
    let filter = filter_clause(&live_row_filter::<T>(id), &mut placeholders)?;
    let sql = format!(
        "SELECT {} FROM {} WHERE {} LIMIT 1",
        select_list::<T>(),
        T::NAME,
        filter.sql,
    );
    Ok(Statement::new(sql, filter.binds))
}

/// Builds the paged `SELECT`, or `None` when the offset exceeds `BIGINT`.
fn page_statement<T: SqlTable>(page: PageRequest) -> StorageResult<Option<Statement>> {
    let Ok(offset) = i64::try_from(page.offset()) else {
        return Ok(None);
    };
    let filters = FieldMap::new().with(T::DELETED, SqlValue::Bool(false));

    let mut placeholders = Placeholders::new();
    let filter = filter_clause(&filters, &mut placeholders)?;
    let limit_token = placeholders.next_token();
    let offset_token = placeholders.next_token();
    let sql = format!(
        "SELECT {} FROM {} WHERE {} ORDER BY {} LIMIT {limit_token} OFFSET {offset_token}",
        select_list::<T>(),
        T::NAME,
        filter.sql,
        T::ID.name(),
    );
    let mut binds = filter.binds;
    binds.push(SqlValue::BigInt(i64::from(page.limit())));
    binds.push(SqlValue::BigInt(offset));
    Ok(Some(Statement::new(sql, binds)))
}

fn touching_update<T: SqlTable>(
    fields: &FieldMap<T::Column>,
    id: i64,
    now: DateTime<Utc>,
) -> StorageResult<Statement> {
    let mut placeholders = Placeholders::new();
    let mut assignments = Vec::with_capacity(2);
    let mut binds = Vec::with_capacity(fields.len() + 3);
    if !fields.is_empty() {
        let set = assignment_clause(fields, &mut placeholders)?;
        assignments.push(set.sql);
        binds.extend(set.binds);
    }
    assignments.push(format!(
        "{updated} = GREATEST({token}, {created})",
        updated = T::UPDATED_AT.name(),
        token = placeholders.next_token(),
        created = T::CREATED_AT.name(),
    ));
    binds.push(SqlValue::Timestamp(now));

    let filter = filter_clause(&live_row_filter::<T>(id), &mut placeholders)?;
    binds.extend(filter.binds);
    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        T::NAME,
        assignments.join(", "),
        filter.sql,
    );
    Ok(Statement::new(sql, binds))
}

fn live_row_filter<T: SqlTable>(id: i64) -> FieldMap<T::Column> {
    FieldMap::new()
        .with(T::ID, SqlValue::BigInt(id))
        .with(T::DELETED, SqlValue::Bool(false))
}

fn reject_managed_columns<T: SqlTable>(fields: &FieldMap<T::Column>) -> StorageResult<()> {
    if fields.contains(T::ID) {
        return Err(StorageError::InvalidArgument(
            "the key column is assigned by storage and cannot be written",
        ));
    }
    if fields.contains(T::CREATED_AT) || fields.contains(T::UPDATED_AT) {
        return Err(StorageError::InvalidArgument(
            "timestamp columns are stamped by storage and cannot be written",
        ));
    }
    Ok(())
}

fn select_list<T: SqlTable>() -> String {
    T::columns()
        .iter()
        .map(|column| column.name())
        .collect::<Vec<_>>()
        .join(", ")
}
