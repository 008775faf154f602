//! Error types for SQLite operations.

use lode_query::DriverError;
use thiserror::Error;

/// Result type for SQLite operations.
pub type SqliteResult<T> = Result<T, SqliteError>;

/// Error type for SQLite operations.
///
/// Every variant carries the engine's diagnostic text. At the driver
/// boundary all variants flatten into a single [`DriverError`].
#[derive(Error, Debug)]
pub enum SqliteError {
    /// The database could not be opened, or the connection is closed.
    #[error("connection error for '{path}': {message}")]
    Connection {
        /// The database path.
        path: String,
        /// The engine message.
        message: String,
    },

    /// The statement text could not be compiled.
    #[error("failed to prepare statement: {message}")]
    Prepare {
        /// The statement text.
        sql: String,
        /// The engine message.
        message: String,
    },

    /// Executing or stepping a statement failed.
    #[error("SQL error: {0}")]
    Sql(String),

    /// A parameter was rejected by the engine.
    #[error("failed to bind parameter {position}: {message}")]
    Bind {
        /// The 1-based parameter position.
        position: usize,
        /// The engine message.
        message: String,
    },

    /// A column or parameter index outside the valid range.
    #[error("index {index} out of bounds (count {count})")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The number of valid slots.
        count: usize,
    },

    /// Finalizing a statement reported a failure.
    #[error("failed to finalize statement: {0}")]
    Finalize(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// The taxonomy member of a [`SqliteError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`SqliteError::Connection`].
    Connection,
    /// See [`SqliteError::Prepare`].
    Prepare,
    /// See [`SqliteError::Sql`].
    Sql,
    /// See [`SqliteError::Bind`].
    Bind,
    /// See [`SqliteError::IndexOutOfBounds`].
    IndexOutOfBounds,
    /// See [`SqliteError::Finalize`].
    Finalize,
    /// See [`SqliteError::Config`].
    Config,
}

impl SqliteError {
    /// Create a connection error.
    pub fn connection(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a prepare error.
    pub fn prepare(sql: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Prepare {
            sql: sql.into(),
            message: message.into(),
        }
    }

    /// Create an SQL execution error.
    pub fn sql(message: impl Into<String>) -> Self {
        Self::Sql(message.into())
    }

    /// Create a bind error.
    pub fn bind(position: usize, message: impl Into<String>) -> Self {
        Self::Bind {
            position,
            message: message.into(),
        }
    }

    /// Create an index out of bounds error.
    pub fn index_out_of_bounds(index: usize, count: usize) -> Self {
        Self::IndexOutOfBounds { index, count }
    }

    /// Create a finalize error.
    pub fn finalize(message: impl Into<String>) -> Self {
        Self::Finalize(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The taxonomy member of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection { .. } => ErrorKind::Connection,
            Self::Prepare { .. } => ErrorKind::Prepare,
            Self::Sql(_) => ErrorKind::Sql,
            Self::Bind { .. } => ErrorKind::Bind,
            Self::IndexOutOfBounds { .. } => ErrorKind::IndexOutOfBounds,
            Self::Finalize(_) => ErrorKind::Finalize,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<SqliteError> for DriverError {
    fn from(err: SqliteError) -> Self {
        let message = match &err {
            SqliteError::Connection { .. } => {
                format!("Connection lost or failure to establish a connection: {}", err)
            }
            SqliteError::Bind { .. } => format!("Value to column bind failure: {}", err),
            SqliteError::IndexOutOfBounds { .. } => format!("Index out of bounds: {}", err),
            SqliteError::Prepare { .. } | SqliteError::Sql(_) | SqliteError::Finalize(_) => {
                format!("SQL statement invalid or cannot be executed: {}", err)
            }
            SqliteError::Config(_) => format!("Invalid configuration: {}", err),
        };
        DriverError::new(message).with_source(err)
    }
}
