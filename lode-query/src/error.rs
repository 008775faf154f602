//! The generic driver error.
//!
//! Drivers translate every engine-specific failure into a single
//! [`DriverError`] carrying a human-readable message, so callers never
//! branch on engine error kinds.
//!
//! ```rust
//! use lode_query::DriverError;
//!
//! let err = DriverError::new("Index out of bounds");
//! assert_eq!(err.to_string(), "Index out of bounds");
//! ```

use std::fmt;

use thiserror::Error;

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// The single error kind surfaced by drivers.
#[derive(Error, Debug)]
pub struct DriverError {
    /// The error message.
    pub message: String,
    /// The underlying error, if any.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl DriverError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
