//! Typed columns, bind values, and the field mappings built from them.

use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{BigInt, Bool, Nullable, Text, Timestamptz};
use std::collections::BTreeMap;
use std::fmt;

/// A column identifier drawn from a closed, compile-time-known set.
///
/// Implementations are plain enums whose variants map to static column
/// names. There is no constructor from arbitrary strings, so
/// identifiers in generated SQL can never originate from request input.
pub trait SqlColumn: Copy + Ord + fmt::Debug + Send + Sync + 'static {
    /// Returns the SQL identifier for the column.
    fn name(self) -> &'static str;
}

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// 64-bit integer.
    BigInt(i64),
    /// Non-null text.
    Text(String),
    /// Text that may be `NULL`.
    NullableText(Option<String>),
    /// Boolean flag.
    Bool(bool),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    /// Appends this value to a boxed query as the next bind parameter.
    pub(crate) fn bind_to(
        self,
        query: BoxedSqlQuery<'static, Pg, SqlQuery>,
    ) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
        match self {
            Self::BigInt(value) => query.bind::<BigInt, _>(value),
            Self::Text(value) => query.bind::<Text, _>(value),
            Self::NullableText(value) => query.bind::<Nullable<Text>, _>(value),
            Self::Bool(value) => query.bind::<Bool, _>(value),
            Self::Timestamp(value) => query.bind::<Timestamptz, _>(value),
        }
    }
}

/// Ordered mapping of columns to values.
///
/// Used both for assignments (`SET`/`INSERT`) and for equality filters.
/// Iteration follows the column enum's declaration order, which keeps
/// generated SQL stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap<C: SqlColumn> {
    entries: BTreeMap<C, SqlValue>,
}

impl<C: SqlColumn> FieldMap<C> {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Sets a column value, replacing any earlier value for the column.
    #[must_use]
    pub fn with(mut self, column: C, value: SqlValue) -> Self {
        self.set(column, value);
        self
    }

    /// Sets a column value in place.
    pub fn set(&mut self, column: C, value: SqlValue) {
        self.entries.insert(column, value);
    }

    /// Returns `true` when the column has a value.
    #[must_use]
    pub fn contains(&self, column: C) -> bool {
        self.entries.contains_key(&column)
    }

    /// Returns `true` when no columns are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of mapped columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over the mapped columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (C, &SqlValue)> {
        self.entries.iter().map(|(column, value)| (*column, value))
    }
}

impl<C: SqlColumn> Default for FieldMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: SqlColumn> FromIterator<(C, SqlValue)> for FieldMap<C> {
    fn from_iter<I: IntoIterator<Item = (C, SqlValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
