//! SQLite connection holding the navigation tables.

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use super::migrations;

/// One migrated connection to the navigation database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens or creates the database file at `path`, then brings its schema
    /// up to [`migrations::CURRENT_SCHEMA_VERSION`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        debug!(path = %path.as_ref().display(), "opening navigation database");
        Self::migrated(Connection::open(path)?)
    }

    /// Private in-memory database, gone once dropped. Used by tests and dry tooling.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::migrated(Connection::open_in_memory()?)
    }

    fn migrated(conn: Connection) -> Result<Self, rusqlite::Error> {
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    /// Schema version recorded in `schema_version`.
    pub fn schema_version(&self) -> i32 {
        migrations::get_schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
