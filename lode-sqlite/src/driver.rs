//! The [`Driver`] implementation for SQLite.

use lode_query::{Driver, DriverError, DriverResult, ResultSet, Value};
use tracing::{debug, instrument, trace, warn};

use crate::config::SqliteConfig;
use crate::connection::SqliteConnection;
use crate::error::SqliteResult;
use crate::statement::Statement;

/// Executes SQL with positional parameters against one SQLite connection.
///
/// Without parameters the text goes through the multi-statement exec path.
/// With parameters it is prepared as a single statement, each value is
/// bound by kind at positions `1..=N`, and the statement is stepped to
/// completion. Every internal error surfaces as one [`DriverError`].
#[derive(Debug)]
pub struct SqliteDriver {
    connection: SqliteConnection,
}

impl SqliteDriver {
    /// Open a driver over the database described by `config`.
    pub fn open(config: SqliteConfig) -> DriverResult<Self> {
        Ok(Self::new(SqliteConnection::open(config)?))
    }

    /// Open a driver from a SQLite URL.
    pub fn from_url(url: &str) -> DriverResult<Self> {
        Self::open(SqliteConfig::from_url(url)?)
    }

    /// Wrap an already open connection.
    pub fn new(connection: SqliteConnection) -> Self {
        Self { connection }
    }

    /// The underlying connection.
    pub fn connection(&self) -> &SqliteConnection {
        &self.connection
    }

    /// Close the underlying connection. Closing twice is a no-op.
    pub fn close(&mut self) -> DriverResult<()> {
        self.connection.close().map_err(DriverError::from)
    }

    fn run(&self, sql: &str, params: &[Value]) -> SqliteResult<ResultSet> {
        if params.is_empty() {
            debug!("executing without parameters");
            return self.connection.query(sql);
        }

        self.connection.prepare(sql)?.execute(|stmt| {
            for (index, value) in params.iter().enumerate() {
                bind_parameter(stmt, index + 1, value)?;
            }
            Ok(())
        })
    }
}

/// Bind `value` at `position` according to its kind.
///
/// Integers that fit in 32 bits use the narrow bind. Values with no integer
/// or float form fall back to text; NULL binds as NULL.
fn bind_parameter(stmt: &mut Statement<'_>, position: usize, value: &Value) -> SqliteResult<()> {
    trace!(position, kind = value.kind(), "binding parameter");

    if let Some(int) = value.as_int() {
        return match i32::try_from(int) {
            Ok(narrow) => stmt.bind_int(position, narrow),
            Err(_) => stmt.bind_int64(position, int),
        };
    }
    if let Some(float) = value.as_float() {
        return stmt.bind_double(position, float);
    }
    match value.as_text() {
        Some(text) => stmt.bind_text(position, &text),
        None => stmt.bind_null(position),
    }
}

impl Driver for SqliteDriver {
    #[instrument(skip(self, params), fields(sql = %sql, param_count = params.len()))]
    fn execute(&mut self, sql: &str, params: &[Value]) -> DriverResult<ResultSet> {
        match self.run(sql, params) {
            Ok(rows) => {
                debug!(rows = rows.len(), "query completed");
                Ok(rows)
            }
            Err(err) => {
                warn!(error = %err, kind = ?err.kind(), "query failed");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lode_query::Sql;

    fn driver() -> SqliteDriver {
        let mut driver = SqliteDriver::open(SqliteConfig::memory()).unwrap();
        driver
            .execute("CREATE TABLE t (id INTEGER PRIMARY KEY, label TEXT, score REAL)", &[])
            .unwrap();
        driver
    }

    #[test]
    fn test_bind_dispatch_by_kind() {
        let mut driver = SqliteDriver::open(SqliteConfig::memory()).unwrap();
        let rows = driver
            .execute(
                "SELECT typeof(?1) AS a, typeof(?2) AS b, typeof(?3) AS c, typeof(?4) AS d, typeof(?5) AS e, typeof(?6) AS f",
                &[
                    Value::Int(5),
                    Value::Int(i64::MAX),
                    Value::Float(0.5),
                    Value::Bool(true),
                    Value::Text("x".into()),
                    Value::Null,
                ],
            )
            .unwrap();
        let row = rows.first().unwrap();
        assert_eq!(row.get_text("a"), Some("integer"));
        assert_eq!(row.get_text("b"), Some("integer"));
        assert_eq!(row.get_text("c"), Some("real"));
        assert_eq!(row.get_text("d"), Some("integer"));
        assert_eq!(row.get_text("e"), Some("text"));
        assert_eq!(row.get_text("f"), Some("null"));
    }

    #[test]
    fn test_wide_integer_round_trips() {
        let mut driver = driver();
        driver
            .execute("INSERT INTO t (id, label) VALUES (?1, ?2)", &[Value::Int(1 << 40), "wide".into()])
            .unwrap();
        let rows = driver.execute("SELECT id FROM t", &[]).unwrap();
        assert_eq!(rows.first().unwrap().get_text("id"), Some("1099511627776"));
    }

    #[test]
    fn test_execute_sql_builder() {
        let mut driver = driver();
        driver
            .execute("INSERT INTO t (label, score) VALUES ('a', 1.5), ('b', 2.5)", &[])
            .unwrap();
        let rows = driver
            .execute_sql(Sql::new("SELECT label FROM t WHERE score > ").bind(2.0))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.first().unwrap().get_text("label"), Some("b"));
    }

    #[test]
    fn test_errors_flatten_to_driver_error() {
        let mut driver = driver();
        let err = driver.execute("SELEKT * FROM t", &[]).unwrap_err();
        assert!(err.message().starts_with("SQL statement invalid or cannot be executed"));

        let err = driver
            .execute("SELECT * FROM t WHERE id = ?1", &[Value::Int(1), Value::Int(2)])
            .unwrap_err();
        assert!(err.message().starts_with("Value to column bind failure"));
        assert_eq!(driver.connection().open_statements(), 0);
    }

    #[test]
    fn test_close_then_execute_fails() {
        let mut driver = driver();
        driver.close().unwrap();
        driver.close().unwrap();
        let err = driver.execute("SELECT 1", &[]).unwrap_err();
        assert!(err.message().starts_with("Connection lost or failure to establish a connection"));
    }
}
