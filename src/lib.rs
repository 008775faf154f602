//! # Lode
//!
//! A small synchronous SQL execution core behind a generic driver contract.
//!
//! Lode provides:
//! - A scalar [`Value`] model shared by bind parameters and result cells
//! - Rows materialized as ordered column-name to value maps
//! - A SQLite driver with positional, kind-dispatched parameter binding
//! - One flattened [`DriverError`] at the driver boundary
//!
//! ## Quick Start
//!
//! ```rust
//! use lode::prelude::*;
//!
//! fn main() -> Result<(), DriverError> {
//!     let mut driver = SqliteDriver::open(SqliteConfig::memory())?;
//!
//!     driver.execute(
//!         "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL);
//!          INSERT INTO users (name) VALUES ('Tanner');
//!          INSERT INTO users (name) VALUES ('Jill');",
//!         &[],
//!     )?;
//!
//!     let users = driver.execute_sql(Sql::new("SELECT * FROM users WHERE name = ").bind("Jill"))?;
//!     assert_eq!(users.len(), 1);
//!     assert_eq!(users.first().and_then(|u| u.get_text("id")), Some("2"));
//!
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The generic query contract.
pub mod query {
    pub use lode_query::*;
}

/// The SQLite driver.
pub mod sqlite {
    pub use lode_sqlite::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use lode_query::prelude::*;
    pub use lode_sqlite::{ColumnMode, SqliteConfig, SqliteConnection, SqliteDriver};
}

// Re-export key types at the crate root
pub use lode_query::{Driver, DriverError, DriverResult, ResultSet, Row, Sql, Value};
pub use lode_sqlite::{SqliteConfig, SqliteDriver};
