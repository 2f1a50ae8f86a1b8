//! Staff schema bootstrap.
//!
//! The schema version lives in `PRAGMA user_version`. Opening a connection
//! brings an older file forward; repositories only ask whether the file is
//! exactly at [`latest_version`].

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Ordered `(version, sql)` steps.
const STEPS: &[(u32, &str)] = &[(1, include_str!("0001_staff_tables.sql"))];

/// Where a database file stands relative to this binary's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Current,
    Behind { found: u32 },
    Ahead { found: u32 },
}

pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Compares the recorded schema version with [`latest_version`].
pub fn schema_state(conn: &Connection) -> DbResult<SchemaState> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();
    Ok(match found {
        v if v == latest => SchemaState::Current,
        v if v < latest => SchemaState::Behind { found: v },
        v => SchemaState::Ahead { found: v },
    })
}

/// Runs every step newer than the recorded version inside one transaction.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer binary.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = match schema_state(conn)? {
        SchemaState::Current => return Ok(()),
        SchemaState::Ahead { found } => {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: found,
                latest_supported: latest_version(),
            })
        }
        SchemaState::Behind { found } => found,
    };

    let tx = conn.transaction()?;
    for (version, sql) in STEPS.iter().filter(|(version, _)| *version > from) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from} to_version={}",
        latest_version()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, schema_state, SchemaState};
    use rusqlite::Connection;

    #[test]
    fn fresh_file_is_behind_until_migrated() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_state(&conn).unwrap(), SchemaState::Behind { found: 0 });

        apply_migrations(&mut conn).unwrap();
        assert_eq!(schema_state(&conn).unwrap(), SchemaState::Current);
    }

    #[test]
    fn newer_file_is_ahead() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", 77).unwrap();
        assert_eq!(schema_state(&conn).unwrap(), SchemaState::Ahead { found: 77 });
    }
}
