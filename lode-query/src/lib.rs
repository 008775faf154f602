//! # lode-query
//!
//! The generic query contract shared by Lode drivers:
//! - [`Value`]: the scalar model used for bind parameters and result cells
//! - [`Row`] and [`ResultSet`]: materialized query output
//! - [`DriverError`]: the single error kind drivers surface
//! - [`Driver`]: the synchronous execute-with-parameters contract
//! - [`Sql`]: raw SQL text with positional parameter binding
//!
//! ```rust
//! use lode_query::{Row, Sql, Value};
//!
//! let (text, params) = Sql::new("SELECT * FROM users WHERE name = ").bind("Jill").build();
//! assert_eq!(text, "SELECT * FROM users WHERE name = ?1");
//! assert_eq!(params, vec![Value::Text("Jill".into())]);
//!
//! let mut row = Row::new();
//! row.insert("id", "2");
//! assert_eq!(row.get_text("id"), Some("2"));
//! ```

#![deny(missing_docs)]

pub mod driver;
pub mod error;
pub mod logging;
pub mod raw;
pub mod row;
pub mod value;

pub use driver::Driver;
pub use error::{DriverError, DriverResult};
pub use raw::Sql;
pub use row::{ResultSet, Row};
pub use value::Value;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::driver::Driver;
    pub use crate::error::{DriverError, DriverResult};
    pub use crate::raw::Sql;
    pub use crate::raw_query;
    pub use crate::row::{ResultSet, Row};
    pub use crate::value::Value;
}
