//! Prepared statements and the bind/step/finalize protocol.
//!
//! A [`Statement`] moves through `Prepared -> Bound -> Stepping -> Done`.
//! Parameters are bound by 1-based position before stepping; rows are
//! pulled one at a time through a [`Cursor`]. Finalizing consumes the
//! statement, so a finalized handle can never be bound or stepped again,
//! and a statement dropped without an explicit [`Statement::finalize`] is
//! finalized by its destructor. Either way the engine handle is released
//! exactly once.

use lode_query::{ResultSet, Row};
use rusqlite::ToSql;
use rusqlite::types::Null;
use tracing::{debug, trace};

use crate::config::ColumnMode;
use crate::connection::SqliteConnection;
use crate::error::{SqliteError, SqliteResult};
use crate::row::materialize;

/// Where a statement is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementState {
    /// Compiled, nothing bound yet.
    Prepared,
    /// At least one parameter bound.
    Bound,
    /// At least one row has been produced.
    Stepping,
    /// The engine reported completion or an error.
    Done,
}

/// Outcome of a single [`Cursor::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The engine produced a row.
    Row(Row),
    /// No more rows.
    Done,
}

/// Keeps the connection's live-statement count in step with the handle.
struct LiveHandle<'conn> {
    conn: &'conn SqliteConnection,
}

impl Drop for LiveHandle<'_> {
    fn drop(&mut self) {
        self.conn.statement_released();
        trace!("statement handle released");
    }
}

/// A compiled SQL statement borrowed from a [`SqliteConnection`].
pub struct Statement<'conn> {
    stmt: rusqlite::Statement<'conn>,
    live: LiveHandle<'conn>,
    sql: String,
    state: StatementState,
    mode: ColumnMode,
}

impl std::fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statement")
            .field("sql", &self.sql)
            .field("state", &self.state)
            .finish()
    }
}

impl<'conn> Statement<'conn> {
    pub(crate) fn new(conn: &'conn SqliteConnection, stmt: rusqlite::Statement<'conn>, sql: &str) -> Self {
        conn.statement_opened();
        Self {
            stmt,
            live: LiveHandle { conn },
            sql: sql.to_string(),
            state: StatementState::Prepared,
            mode: conn.column_mode(),
        }
    }

    /// The statement text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The current lifecycle state.
    pub fn state(&self) -> StatementState {
        self.state
    }

    /// Number of parameter placeholders.
    pub fn parameter_count(&self) -> usize {
        self.stmt.parameter_count()
    }

    /// Number of result columns.
    pub fn column_count(&self) -> usize {
        self.stmt.column_count()
    }

    /// Result column names, in order.
    pub fn column_names(&self) -> Vec<String> {
        self.stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn bind<T: ToSql>(&mut self, position: usize, value: T) -> SqliteResult<()> {
        if matches!(self.state, StatementState::Stepping | StatementState::Done) {
            return Err(SqliteError::bind(
                position,
                "statement must be reset before binding again",
            ));
        }

        let count = self.parameter_count();
        if position == 0 || position > count {
            return Err(SqliteError::bind(
                position,
                format!("position out of range, statement has {} placeholders", count),
            ));
        }

        self.stmt
            .raw_bind_parameter(position, value)
            .map_err(|e| SqliteError::bind(position, e.to_string()))?;
        self.state = StatementState::Bound;
        trace!(position, "parameter bound");
        Ok(())
    }

    /// Bind text at `position`.
    pub fn bind_text(&mut self, position: usize, value: &str) -> SqliteResult<()> {
        self.bind(position, value)
    }

    /// Bind a 32-bit integer at `position`.
    pub fn bind_int(&mut self, position: usize, value: i32) -> SqliteResult<()> {
        self.bind(position, value)
    }

    /// Bind a 64-bit integer at `position`.
    pub fn bind_int64(&mut self, position: usize, value: i64) -> SqliteResult<()> {
        self.bind(position, value)
    }

    /// Bind a double at `position`.
    pub fn bind_double(&mut self, position: usize, value: f64) -> SqliteResult<()> {
        self.bind(position, value)
    }

    /// Bind a boolean at `position`, stored as the integer `0` or `1`.
    pub fn bind_bool(&mut self, position: usize, value: bool) -> SqliteResult<()> {
        self.bind(position, i32::from(value))
    }

    /// Bind SQL NULL at `position`.
    pub fn bind_null(&mut self, position: usize) -> SqliteResult<()> {
        self.bind(position, Null)
    }

    /// Clear all bindings and rewind, so the statement can run again.
    pub fn reset(&mut self) {
        // Dropping a cursor already rewinds the engine statement.
        self.stmt.clear_bindings();
        self.state = StatementState::Prepared;
        trace!(sql = %self.sql, "statement reset");
    }

    /// Start stepping.
    pub fn cursor(&mut self) -> Cursor<'_> {
        Cursor {
            rows: self.stmt.raw_query(),
            state: &mut self.state,
            mode: self.mode,
        }
    }

    /// Step to completion, handing each row to `on_row`.
    pub fn for_each_row<F>(&mut self, mut on_row: F) -> SqliteResult<()>
    where
        F: FnMut(Row),
    {
        let mut cursor = self.cursor();
        while let Step::Row(row) = cursor.step()? {
            on_row(row);
        }
        Ok(())
    }

    /// Bind, step to completion and finalize.
    ///
    /// `bind` runs first; if it fails, stepping is skipped. Finalize runs
    /// exactly once on every path. When an earlier step already failed,
    /// that error wins over the finalize error.
    pub fn run<B, F>(mut self, bind: B, mut on_row: F) -> SqliteResult<()>
    where
        B: FnOnce(&mut Self) -> SqliteResult<()>,
        F: FnMut(Row),
    {
        let outcome = bind(&mut self).and_then(|()| self.for_each_row(&mut on_row));
        let finalized = self.finalize();

        match (outcome, finalized) {
            (Err(err), Err(finalize_err)) => {
                debug!(error = %finalize_err, "finalize reported the earlier failure again");
                Err(err)
            }
            (Err(err), Ok(())) => Err(err),
            (Ok(()), finalized) => finalized,
        }
    }

    /// Like [`run`](Self::run), collecting the rows into a [`ResultSet`].
    pub fn execute<B>(self, bind: B) -> SqliteResult<ResultSet>
    where
        B: FnOnce(&mut Self) -> SqliteResult<()>,
    {
        let mut rows = ResultSet::new();
        self.run(bind, |row| rows.push(row))?;
        Ok(rows)
    }

    /// Release the engine handle, reporting any deferred failure.
    pub fn finalize(self) -> SqliteResult<()> {
        let Statement { stmt, live, sql, .. } = self;
        let result = stmt
            .finalize()
            .map_err(|e| SqliteError::finalize(e.to_string()));
        drop(live);
        trace!(sql = %sql, ok = result.is_ok(), "statement finalized");
        result
    }
}

/// Steps a [`Statement`] one row at a time.
///
/// Dropping the cursor rewinds the statement.
pub struct Cursor<'stmt> {
    rows: rusqlite::Rows<'stmt>,
    state: &'stmt mut StatementState,
    mode: ColumnMode,
}

impl Cursor<'_> {
    /// Advance by one row.
    pub fn step(&mut self) -> SqliteResult<Step> {
        match self.rows.next() {
            Ok(Some(row)) => {
                *self.state = StatementState::Stepping;
                Ok(Step::Row(materialize(row, self.mode)?))
            }
            Ok(None) => {
                *self.state = StatementState::Done;
                Ok(Step::Done)
            }
            Err(e) => {
                *self.state = StatementState::Done;
                Err(SqliteError::sql(e.to_string()))
            }
        }
    }

    /// Advance by one row, returning `None` when done.
    pub fn next_row(&mut self) -> SqliteResult<Option<Row>> {
        match self.step()? {
            Step::Row(row) => Ok(Some(row)),
            Step::Done => Ok(None),
        }
    }
}
