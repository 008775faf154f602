//! SQLite connection wrapper.

use std::borrow::Cow;
use std::cell::Cell;
use std::ffi::CStr;

use lode_query::{ResultSet, Row};
use rusqlite::{Batch, Connection, ffi};
use tracing::{debug, trace, warn};

use crate::config::{ColumnMode, SqliteConfig};
use crate::error::{SqliteError, SqliteResult};
use crate::statement::Statement;

/// An open SQLite database handle.
///
/// Opening either yields a live handle or fails without leaving one behind.
/// The handle is released exactly once: by [`close`](Self::close), or on
/// drop if `close` was never called.
pub struct SqliteConnection {
    conn: Option<Connection>,
    config: SqliteConfig,
    /// Prepared-statement handles not yet finalized.
    live_statements: Cell<usize>,
}

impl std::fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.config.path_str())
            .field("open", &self.is_open())
            .field("live_statements", &self.live_statements.get())
            .finish()
    }
}

impl SqliteConnection {
    /// Open the database described by `config`.
    ///
    /// The file is created if missing and opened read-write in serialized
    /// threading mode. The configuration's PRAGMA batch runs right after.
    pub fn open(config: SqliteConfig) -> SqliteResult<Self> {
        let path = config.path_str().into_owned();

        // rusqlite closes the half-opened handle itself when the open fails.
        let conn = Connection::open_with_flags(config.path.as_path(), config.open_flags())
            .map_err(|e| SqliteError::connection(&path, e.to_string()))?;

        let connection = Self {
            conn: Some(conn),
            config,
            live_statements: Cell::new(0),
        };

        let init_sql = connection.config.init_sql();
        if !init_sql.is_empty() {
            connection
                .exec(&init_sql, |_| {})
                .map_err(|e| SqliteError::connection(&path, e.to_string()))?;
        }

        debug!(path = %path, "SQLite connection opened");
        Ok(connection)
    }

    /// Open an in-memory database with default settings.
    pub fn open_in_memory() -> SqliteResult<Self> {
        Self::open(SqliteConfig::memory())
    }

    /// The configuration this connection was opened with.
    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// The database path, lossily decoded for display.
    pub fn path(&self) -> Cow<'_, str> {
        self.config.path_str()
    }

    /// How result cells are materialized.
    pub fn column_mode(&self) -> ColumnMode {
        self.config.column_mode
    }

    /// Check whether the handle is still open.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Number of prepared statements that have not been finalized yet.
    pub fn open_statements(&self) -> usize {
        self.live_statements.get()
    }

    pub(crate) fn statement_opened(&self) {
        self.live_statements.set(self.live_statements.get() + 1);
    }

    pub(crate) fn statement_released(&self) {
        self.live_statements
            .set(self.live_statements.get().saturating_sub(1));
    }

    /// Borrow the engine handle, failing if the connection was closed.
    pub(crate) fn inner(&self) -> SqliteResult<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| SqliteError::connection(self.path(), "connection is closed"))
    }

    /// The engine's most recent diagnostic message.
    ///
    /// Returns `None` once the connection is closed.
    pub fn last_error_message(&self) -> Option<String> {
        let conn = self.conn.as_ref()?;
        // SAFETY: the handle is valid while `conn` is borrowed, and
        // sqlite3_errmsg returns a NUL-terminated string owned by the engine
        // that stays valid until the next call on this handle.
        unsafe {
            let message = ffi::sqlite3_errmsg(conn.handle());
            if message.is_null() {
                return None;
            }
            Some(CStr::from_ptr(message).to_string_lossy().into_owned())
        }
    }

    /// Rowid of the most recent successful INSERT.
    pub fn last_insert_rowid(&self) -> SqliteResult<i64> {
        Ok(self.inner()?.last_insert_rowid())
    }

    /// Rows modified by the most recent INSERT, UPDATE or DELETE.
    pub fn changes(&self) -> SqliteResult<u64> {
        Ok(self.inner()?.changes())
    }

    /// Compile `sql` into a prepared statement.
    pub fn prepare(&self, sql: &str) -> SqliteResult<Statement<'_>> {
        let stmt = self
            .inner()?
            .prepare(sql)
            .map_err(|e| SqliteError::prepare(sql, e.to_string()))?;
        trace!(sql = %sql, "statement prepared");
        Ok(Statement::new(self, stmt, sql))
    }

    /// Run one or more `;`-separated statements, calling `on_row` for every
    /// row any of them produces.
    ///
    /// Parameters cannot be bound on this path. Each statement is finalized
    /// before the next one is compiled, including when stepping fails.
    pub fn exec<F>(&self, sql: &str, mut on_row: F) -> SqliteResult<()>
    where
        F: FnMut(Row),
    {
        trace!(sql = %sql, "exec");
        let mut batch = Batch::new(self.inner()?, sql);
        while let Some(stmt) = batch
            .next()
            .map_err(|e| SqliteError::prepare(sql, e.to_string()))?
        {
            Statement::new(self, stmt, sql).run(|_| Ok(()), &mut on_row)?;
        }
        Ok(())
    }

    /// Run `sql` through [`exec`](Self::exec) and collect the rows.
    pub fn query(&self, sql: &str) -> SqliteResult<ResultSet> {
        let mut rows = ResultSet::new();
        self.exec(sql, |row| rows.push(row))?;
        Ok(rows)
    }

    /// Release the handle. Calling this on a closed connection does nothing.
    pub fn close(&mut self) -> SqliteResult<()> {
        let Some(conn) = self.conn.take() else {
            trace!(path = %self.path(), "connection already closed");
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                debug!(path = %self.path(), "SQLite connection closed");
                Ok(())
            }
            Err((conn, err)) => {
                // The engine kept the handle open; keep it so a later close can retry.
                self.conn = Some(conn);
                Err(SqliteError::connection(self.path(), err.to_string()))
            }
        }
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(error = %err, "failed to close SQLite connection on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let conn = SqliteConnection::open_in_memory().unwrap();
        assert!(conn.is_open());
        assert_eq!(conn.path(), ":memory:");
        assert_eq!(conn.open_statements(), 0);
    }

    #[test]
    fn test_open_failure_is_connection_error() {
        let config = SqliteConfig::file("/definitely/not/a/dir/lode.db");
        let err = SqliteConnection::open(config).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Connection);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        conn.close().unwrap();
        assert!(!conn.is_open());
        conn.close().unwrap();
        assert!(conn.last_error_message().is_none());
    }

    #[test]
    fn test_operations_after_close_fail() {
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        conn.close().unwrap();
        let err = conn.query("SELECT 1").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Connection);
        assert!(conn.prepare("SELECT 1").is_err());
    }

    #[test]
    fn test_exec_runs_every_statement() {
        let conn = SqliteConnection::open_in_memory().unwrap();
        let rows = conn
            .query("CREATE TABLE t (v TEXT); INSERT INTO t VALUES ('a'); SELECT v FROM t; SELECT 2 AS n;")
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows()[0].get_text("v"), Some("a"));
        assert_eq!(rows.rows()[1].get_text("n"), Some("2"));
        assert_eq!(conn.open_statements(), 0);
    }

    #[test]
    fn test_exec_prepare_failure() {
        let conn = SqliteConnection::open_in_memory().unwrap();
        let err = conn.query("SELEKT 1").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Prepare);
        assert!(conn.last_error_message().unwrap().contains("syntax error"));
        assert_eq!(conn.open_statements(), 0);
    }

    #[test]
    fn test_last_insert_rowid_and_changes() {
        let conn = SqliteConnection::open_in_memory().unwrap();
        conn.query("CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT); INSERT INTO t (v) VALUES ('x');")
            .unwrap();
        assert_eq!(conn.last_insert_rowid().unwrap(), 1);
        assert_eq!(conn.changes().unwrap(), 1);
    }

    #[test]
    fn test_init_sql_applied() {
        let conn = SqliteConnection::open(SqliteConfig::memory().foreign_keys(true)).unwrap();
        let rows = conn.query("PRAGMA foreign_keys").unwrap();
        assert_eq!(rows.first().unwrap().get_text("foreign_keys"), Some("1"));
    }
}
