//! Repository error type and storage error classification.
//!
//! # Responsibility
//! - Define `RepoError`, the error surface of every repository call.
//! - Classify raw SQLite failures into "no row", "unique violation" or
//!   "other" so call sites never match on storage error codes themselves.
//!
//! # Invariants
//! - A unique-constraint violation always becomes `RepoError::Conflict`,
//!   carrying the original storage message.
//! - Any other storage failure is propagated unchanged inside `RepoError::Db`.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use rusqlite::ffi;
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A uniqueness invariant would be or was violated.
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Db(#[from] DbError),
    /// Persisted data cannot be converted to a valid record.
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error("repository requires schema version {expected_version}, got {actual_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("repository requires table `{0}`")]
    MissingRequiredTable(&'static str),
}

/// Outcome of classifying one raw storage failure.
#[derive(Debug)]
pub enum StoreFailure {
    /// A single-row lookup matched nothing.
    NoRow,
    /// A unique or primary key constraint rejected the write.
    UniqueViolation(String),
    Other(rusqlite::Error),
}

/// Sorts a raw SQLite error into the conditions the repository recognizes.
pub fn classify(err: rusqlite::Error) -> StoreFailure {
    match err {
        rusqlite::Error::QueryReturnedNoRows => StoreFailure::NoRow,
        rusqlite::Error::SqliteFailure(code, message)
            if code.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || code.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            StoreFailure::UniqueViolation(
                message.unwrap_or_else(|| "unique constraint violated".to_string()),
            )
        }
        other => StoreFailure::Other(other),
    }
}

impl From<StoreFailure> for RepoError {
    fn from(value: StoreFailure) -> Self {
        match value {
            StoreFailure::NoRow => Self::Db(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)),
            StoreFailure::UniqueViolation(message) => Self::Conflict(message),
            StoreFailure::Other(err) => Self::Db(DbError::Sqlite(err)),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        classify(value).into()
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, RepoError, StoreFailure};
    use rusqlite::Connection;

    fn conn_with_unique_table() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, code TEXT UNIQUE, note TEXT NOT NULL);
             INSERT INTO t (id, code, note) VALUES (1, 'a', 'x');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn unique_violation_becomes_conflict_with_storage_message() {
        let conn = conn_with_unique_table();
        let err = conn
            .execute("INSERT INTO t (id, code, note) VALUES (2, 'a', 'y');", [])
            .unwrap_err();

        match RepoError::from(err) {
            RepoError::Conflict(message) => assert!(message.contains("t.code"), "{message}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn primary_key_collision_is_a_unique_violation() {
        let conn = conn_with_unique_table();
        let err = conn
            .execute("INSERT INTO t (id, code, note) VALUES (1, 'b', 'y');", [])
            .unwrap_err();
        assert!(matches!(classify(err), StoreFailure::UniqueViolation(_)));
    }

    #[test]
    fn no_rows_is_recognized() {
        let conn = conn_with_unique_table();
        let err = conn
            .query_row("SELECT id FROM t WHERE code = 'zzz';", [], |row| {
                row.get::<_, i64>(0)
            })
            .unwrap_err();
        assert!(matches!(classify(err), StoreFailure::NoRow));
    }

    #[test]
    fn other_constraint_failures_pass_through() {
        let conn = conn_with_unique_table();
        let err = conn
            .execute("INSERT INTO t (id, code, note) VALUES (3, 'c', NULL);", [])
            .unwrap_err();
        assert!(matches!(RepoError::from(err), RepoError::Db(_)));
    }
}
