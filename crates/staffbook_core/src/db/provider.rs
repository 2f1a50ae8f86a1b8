//! Connection provider for units of work.
//!
//! # Invariants
//! - Every `connect()` call returns a fresh, migrated connection.
//! - Connections are never shared between concurrent units of work; the
//!   SQLite transaction is the only concurrency-control primitive.

use super::open::open_db_with_timeout;
use super::DbResult;
use crate::config::StoreConfig;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Supplies one logical connection per unit of work.
pub trait ConnectionProvider {
    fn connect(&self) -> DbResult<Connection>;
}

/// File-backed SQLite provider.
#[derive(Debug, Clone)]
pub struct SqliteConnectionProvider {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteConnectionProvider {
    pub fn new(path: impl Into<PathBuf>, busy_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            busy_timeout,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.database.path.clone(), config.busy_timeout())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionProvider for SqliteConnectionProvider {
    fn connect(&self) -> DbResult<Connection> {
        open_db_with_timeout(&self.path, self.busy_timeout)
    }
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for &P {
    fn connect(&self) -> DbResult<Connection> {
        (**self).connect()
    }
}
