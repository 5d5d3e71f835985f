//! Parametrized clause construction.
//!
//! Every fragment produced here references columns through [`SqlColumn`]
//! and values through positional placeholders, so neither identifiers nor
//! values are ever spliced from caller-controlled text.

use super::error::{StorageError, StorageResult};
use super::value::{FieldMap, SqlColumn, SqlValue};

/// Allocates consecutive `PostgreSQL` placeholders (`$1`, `$2`, ...).
///
/// A single counter is threaded through every fragment of one statement so
/// that `SET` and `WHERE` clauses can be concatenated safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholders {
    next: usize,
}

impl Placeholders {
    /// Starts numbering at `$1`.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the next placeholder token.
    pub fn next_token(&mut self) -> String {
        let token = format!("${}", self.next);
        self.next += 1;
        token
    }
}

impl Default for Placeholders {
    fn default() -> Self {
        Self::new()
    }
}

/// A SQL fragment together with the values bound by its placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// Fragment text.
    pub sql: String,
    /// Bind values, in placeholder order.
    pub binds: Vec<SqlValue>,
}

/// Column and value lists for an `INSERT` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertClause {
    /// Comma-separated column list, without parentheses.
    pub columns: String,
    /// Comma-separated placeholder list, without parentheses.
    pub values: String,
    /// Bind values, in placeholder order.
    pub binds: Vec<SqlValue>,
}

/// Builds a `column = $n, ...` assignment list.
///
/// # Errors
///
/// Returns [`StorageError::InvalidArgument`] when `fields` is empty.
pub fn assignment_clause<C: SqlColumn>(
    fields: &FieldMap<C>,
    placeholders: &mut Placeholders,
) -> StorageResult<Clause> {
    if fields.is_empty() {
        return Err(StorageError::InvalidArgument(
            "assignment clause requires at least one field",
        ));
    }
    Ok(equality_list(fields, placeholders, ", "))
}

/// Builds a `column = $n AND ...` equality filter.
///
/// # Errors
///
/// Returns [`StorageError::InvalidArgument`] when `filters` is empty, which
/// would otherwise widen a statement to the whole table.
pub fn filter_clause<C: SqlColumn>(
    filters: &FieldMap<C>,
    placeholders: &mut Placeholders,
) -> StorageResult<Clause> {
    if filters.is_empty() {
        return Err(StorageError::InvalidArgument(
            "filter clause requires at least one column",
        ));
    }
    Ok(equality_list(filters, placeholders, " AND "))
}

/// Builds the column and placeholder lists for an `INSERT`.
///
/// # Errors
///
/// Returns [`StorageError::InvalidArgument`] when `fields` is empty.
pub fn insert_clause<C: SqlColumn>(
    fields: &FieldMap<C>,
    placeholders: &mut Placeholders,
) -> StorageResult<InsertClause> {
    if fields.is_empty() {
        return Err(StorageError::InvalidArgument(
            "insert clause requires at least one field",
        ));
    }
    let mut columns = Vec::with_capacity(fields.len());
    let mut values = Vec::with_capacity(fields.len());
    let mut binds = Vec::with_capacity(fields.len());
    for (column, value) in fields.iter() {
        columns.push(column.name());
        values.push(placeholders.next_token());
        binds.push(value.clone());
    }
    Ok(InsertClause {
        columns: columns.join(", "),
        values: values.join(", "),
        binds,
    })
}

fn equality_list<C: SqlColumn>(
    fields: &FieldMap<C>,
    placeholders: &mut Placeholders,
    separator: &str,
) -> Clause {
    let mut parts = Vec::with_capacity(fields.len());
    let mut binds = Vec::with_capacity(fields.len());
    for (column, value) in fields.iter() {
        parts.push(format!("{} = {}", column.name(), placeholders.next_token()));
        binds.push(value.clone());
    }
    Clause {
        sql: parts.join(separator),
        binds,
    }
}
