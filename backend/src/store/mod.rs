//! SQLite persistence.
//!
//! `Store` only remembers where the database lives; each operation opens its
//! own connection, like every handler in this service does. The query
//! functions in the sub-modules take a `&Connection` so tests can run them
//! against a scratch database.

pub mod lists;
pub mod schema;
pub mod sessions;
pub mod users;

use chrono::{SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a connection with foreign keys enforced and a busy timeout, so
    /// concurrent requests wait on the write lock instead of failing.
    pub fn connect(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(conn)
    }

    /// Creates any missing tables.
    pub fn initialize(&self) -> rusqlite::Result<()> {
        let conn = self.connect()?;
        schema::initialize(&conn)
    }
}

/// Current UTC time as RFC 3339 with millisecond precision. Values sort
/// lexicographically in creation order.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Wraps a domain parse failure on column `idx` as a rusqlite conversion error.
pub(crate) fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::schema;
    use rusqlite::Connection;

    pub fn connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", true).unwrap();
        schema::initialize(&conn).unwrap();
        conn
    }
}
