//! Statement executor over one borrowed connection.
//!
//! # Responsibility
//! - Run parameterized statements with named parameters.
//! - Return affected rows, inserted ids, scalars, single rows, row lists or
//!   multi-type row groups.
//! - Route every SQLite failure through [`classify`](super::error::classify).
//!
//! # Invariants
//! - "No row" on a single-row lookup is `Ok(None)`, never an error.
//! - A `Transaction` derefs to `Connection`, so statements issued through an
//!   executor built from a transaction run inside that transaction.

use super::error::{classify, RepoResult, StoreFailure};
use rusqlite::types::FromSql;
use rusqlite::{Connection, Row, ToSql};

/// Named parameter list, e.g. `named_params! { ":id": id }`.
pub type NamedParams<'p> = &'p [(&'p str, &'p dyn ToSql)];

/// Decodes one joined result row into a fixed group of typed values.
pub trait FromRowGroup: Sized {
    fn from_row_group(row: &Row<'_>) -> RepoResult<Self>;
}

pub struct Executor<'c> {
    conn: &'c Connection,
}

impl<'c> Executor<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Runs a command and returns the number of affected rows.
    pub fn execute(&self, sql: &str, params: NamedParams<'_>) -> RepoResult<usize> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        Ok(stmt.execute(params)?)
    }

    /// Runs an `INSERT` and returns the new row id.
    pub fn insert(&self, sql: &str, params: NamedParams<'_>) -> RepoResult<i64> {
        self.execute(sql, params)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Reads the first column of the first row, `None` when nothing matched.
    pub fn query_scalar<T: FromSql>(
        &self,
        sql: &str,
        params: NamedParams<'_>,
    ) -> RepoResult<Option<T>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        match stmt.query_row(params, |row| row.get::<_, T>(0)) {
            Ok(value) => Ok(Some(value)),
            Err(err) => match classify(err) {
                StoreFailure::NoRow => Ok(None),
                failure => Err(failure.into()),
            },
        }
    }

    /// Reads at most one row.
    pub fn query_one<T>(
        &self,
        sql: &str,
        params: NamedParams<'_>,
        read: impl FnOnce(&Row<'_>) -> RepoResult<T>,
    ) -> RepoResult<Option<T>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let mut rows = stmt.query(params)?;
        match rows.next()? {
            Some(row) => Ok(Some(read(row)?)),
            None => Ok(None),
        }
    }

    /// Reads every row with `read`.
    pub fn query_many<T>(
        &self,
        sql: &str,
        params: NamedParams<'_>,
        mut read: impl FnMut(&Row<'_>) -> RepoResult<T>,
    ) -> RepoResult<Vec<T>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let mut rows = stmt.query(params)?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(read(row)?);
        }
        Ok(items)
    }

    /// Multi-type row mode: every row is decoded into one row group.
    pub fn query_row_groups<G: FromRowGroup>(
        &self,
        sql: &str,
        params: NamedParams<'_>,
    ) -> RepoResult<Vec<G>> {
        self.query_many(sql, params, G::from_row_group)
    }
}
