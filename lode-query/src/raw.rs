//! Raw SQL text with positional parameter binding.
//!
//! [`Sql`] produces the two things a driver consumes: the statement text and
//! the ordered parameter list. Each bound value appends a numbered `?N`
//! placeholder, so the N-th parameter always lands at position N.
//!
//! ```rust
//! use lode_query::Sql;
//!
//! let sql = Sql::new("SELECT * FROM users WHERE name = ").bind("Jill");
//! assert_eq!(sql.sql(), "SELECT * FROM users WHERE name = ?1");
//! assert_eq!(sql.param_count(), 1);
//! ```
//!
//! # Using the raw_query! Macro
//!
//! ```rust
//! use lode_query::raw_query;
//!
//! let name = "Jill";
//! let sql = raw_query!("SELECT * FROM users WHERE name = {} AND id > {}", name, 0);
//! assert_eq!(sql.sql(), "SELECT * FROM users WHERE name = ?1 AND id > ?2");
//! assert_eq!(sql.params().len(), 2);
//! ```

use tracing::debug;

use crate::value::Value;

/// A raw SQL query with parameterized values.
#[derive(Debug, Clone, Default)]
pub struct Sql {
    text: String,
    params: Vec<Value>,
}

impl Sql {
    /// Create a new raw SQL query.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            text: sql.into(),
            params: Vec::new(),
        }
    }

    /// Create an empty SQL query.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a literal SQL string.
    pub fn push(mut self, sql: impl AsRef<str>) -> Self {
        self.text.push_str(sql.as_ref());
        self
    }

    /// Bind a parameter value, appending its placeholder.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self.text.push('?');
        self.text.push_str(&self.params.len().to_string());
        self
    }

    /// Bind multiple parameter values, separated by `, `.
    pub fn bind_many(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self = self.push(", ");
            }
            self = self.bind(value);
        }
        self
    }

    /// Append a clause only when `condition` holds.
    pub fn push_if(self, condition: bool, sql: impl AsRef<str>) -> Self {
        if condition { self.push(sql) } else { self }
    }

    /// Bind a parameter only when `condition` holds.
    pub fn bind_if(self, condition: bool, value: impl Into<Value>) -> Self {
        if condition { self.bind(value) } else { self }
    }

    /// Push SQL and bind a value together.
    pub fn push_bind(self, sql: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.push(sql).bind(value)
    }

    /// Build the final SQL string and parameters.
    pub fn build(self) -> (String, Vec<Value>) {
        debug!(sql_len = self.text.len(), param_count = self.params.len(), "Sql::build()");
        (self.text, self.params)
    }

    /// Get the SQL string.
    pub fn sql(&self) -> &str {
        &self.text
    }

    /// Get the parameters.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Get the number of bound parameters.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Check if the query text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl std::fmt::Display for Sql {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Build a [`Sql`] from a format-like string, binding every `{}` marker.
#[macro_export]
macro_rules! raw_query {
    ($sql:literal) => {
        $crate::raw::Sql::new($sql)
    };
    ($sql:literal, $($arg:expr),+ $(,)?) => {{
        let mut parts = $sql.split("{}");
        let mut sql = $crate::raw::Sql::new(parts.next().unwrap_or(""));
        $(
            sql = sql.bind($arg).push(parts.next().unwrap_or(""));
        )+
        sql
    }};
}
