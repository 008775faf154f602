//! The synchronous driver contract.

use crate::error::DriverResult;
use crate::raw::Sql;
use crate::row::ResultSet;
use crate::value::Value;

/// A database driver that executes SQL text with positional parameters.
///
/// Every call runs to completion on the calling thread. Implementations
/// return either the full result set or a single [`DriverError`]; partial
/// results are never returned alongside an error.
///
/// [`DriverError`]: crate::error::DriverError
pub trait Driver {
    /// Execute `sql`, binding `params` to positions `1..=params.len()`.
    fn execute(&mut self, sql: &str, params: &[Value]) -> DriverResult<ResultSet>;

    /// Execute a query produced by the [`Sql`] builder.
    fn execute_sql(&mut self, sql: Sql) -> DriverResult<ResultSet> {
        let (text, params) = sql.build();
        self.execute(&text, &params)
    }
}
