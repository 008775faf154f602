//! SQLite driver for Lode.
//!
//! Synchronous statement execution on top of `rusqlite`: connections,
//! prepared statements with positional binding, row materialization into
//! [`lode_query::Row`], and a [`lode_query::Driver`] implementation that
//! flattens every engine failure into one [`lode_query::DriverError`].
//!
//! # Example
//!
//! ```rust
//! use lode_query::{Driver, Value};
//! use lode_sqlite::{SqliteConfig, SqliteDriver};
//!
//! let mut driver = SqliteDriver::open(SqliteConfig::memory()).unwrap();
//! driver
//!     .execute(
//!         "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
//!          INSERT INTO users (name) VALUES ('Tanner'), ('Jill');",
//!         &[],
//!     )
//!     .unwrap();
//!
//! let rows = driver
//!     .execute("SELECT * FROM users WHERE name = ?1", &[Value::from("Jill")])
//!     .unwrap();
//! assert_eq!(rows.first().unwrap().get_text("id"), Some("2"));
//! ```

pub mod config;
pub mod connection;
pub mod driver;
pub mod error;
pub mod row;
pub mod statement;

pub use config::{ColumnMode, DatabasePath, JournalMode, SqliteConfig};
pub use connection::SqliteConnection;
pub use driver::SqliteDriver;
pub use error::{ErrorKind, SqliteError, SqliteResult};
pub use statement::{Cursor, Statement, StatementState, Step};
