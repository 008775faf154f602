//! SQLite configuration.
//!
//! The database location is an explicit value handed to
//! [`SqliteConnection::open`](crate::SqliteConnection::open); there is no
//! process-wide path to set beforehand.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use rusqlite::OpenFlags;

use crate::error::{SqliteError, SqliteResult};

/// SQLite database configuration.
#[derive(Debug, Clone, Default)]
pub struct SqliteConfig {
    /// Database path (or ":memory:" for in-memory).
    pub path: DatabasePath,
    /// Enable foreign keys.
    pub foreign_keys: bool,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: Option<u32>,
    /// Journal mode. `None` keeps the engine default.
    pub journal_mode: Option<JournalMode>,
    /// How result cells are materialized.
    pub column_mode: ColumnMode,
}

/// Database path configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabasePath {
    /// In-memory database.
    #[default]
    Memory,
    /// File-based database.
    File(PathBuf),
}

impl DatabasePath {
    /// The path handed to the engine.
    pub fn as_path(&self) -> &Path {
        match self {
            Self::Memory => Path::new(":memory:"),
            Self::File(path) => path,
        }
    }

    /// The path for display. Non-UTF-8 bytes are replaced.
    pub fn display(&self) -> Cow<'_, str> {
        self.as_path().to_string_lossy()
    }

    /// Check if this is an in-memory database.
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

/// How column values are carried into result rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnMode {
    /// Every cell becomes `Value::Text` holding the engine's text rendering.
    #[default]
    Text,
    /// Integers, reals and text keep their storage class.
    Native,
}

/// SQLite journal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
    /// DELETE - Default mode, deletes journal after transaction.
    Delete,
    /// TRUNCATE - Truncates journal instead of deleting.
    Truncate,
    /// PERSIST - Keep journal file, zero out on commit.
    Persist,
    /// MEMORY - Keep journal in memory.
    Memory,
    /// WAL - Write-Ahead Logging.
    Wal,
    /// OFF - No journal.
    Off,
}

impl JournalMode {
    /// Get the SQLite pragma value.
    pub fn as_pragma(&self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Truncate => "TRUNCATE",
            Self::Persist => "PERSIST",
            Self::Memory => "MEMORY",
            Self::Wal => "WAL",
            Self::Off => "OFF",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "delete" => Some(Self::Delete),
            "truncate" => Some(Self::Truncate),
            "persist" => Some(Self::Persist),
            "memory" => Some(Self::Memory),
            "wal" => Some(Self::Wal),
            "off" => Some(Self::Off),
            _ => None,
        }
    }
}

impl SqliteConfig {
    /// Create a new configuration for an in-memory database.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Create a new configuration for a file-based database.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            path: DatabasePath::File(path.as_ref().to_path_buf()),
            ..Default::default()
        }
    }

    /// Parse a SQLite URL into configuration.
    ///
    /// Supported formats:
    /// - `sqlite::memory:` or `:memory:` - In-memory database
    /// - `sqlite://path/to/db.sqlite` - File-based database
    /// - `sqlite:path/to/db.sqlite` or `file:path/to/db.sqlite`
    /// - a bare file path
    ///
    /// Query options: `foreign_keys`, `busy_timeout`, `journal_mode`,
    /// `columns` (`text` or `native`).
    pub fn from_url(url: impl AsRef<str>) -> SqliteResult<Self> {
        let url_str = url.as_ref();

        if url_str == "sqlite::memory:" || url_str == ":memory:" {
            return Ok(Self::memory());
        }

        let (location, query) = match url_str.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (url_str, None),
        };

        let path = location
            .strip_prefix("sqlite://")
            .or_else(|| location.strip_prefix("sqlite:"))
            .or_else(|| location.strip_prefix("file:"))
            .unwrap_or(location);

        if path.is_empty() {
            return Err(SqliteError::config("database path is required"));
        }

        let mut config = if path == ":memory:" {
            Self::memory()
        } else {
            Self::file(path)
        };

        for pair in query.into_iter().flat_map(|q| q.split('&')) {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "mode" if value == "memory" => {
                    config.path = DatabasePath::Memory;
                }
                "foreign_keys" => {
                    config.foreign_keys = value == "true" || value == "1";
                }
                "busy_timeout" => {
                    let ms = value.parse().map_err(|_| {
                        SqliteError::config(format!("invalid busy_timeout '{}'", value))
                    })?;
                    config.busy_timeout_ms = Some(ms);
                }
                "journal_mode" => {
                    let mode = JournalMode::parse(value).ok_or_else(|| {
                        SqliteError::config(format!("unknown journal_mode '{}'", value))
                    })?;
                    config.journal_mode = Some(mode);
                }
                "columns" => {
                    config.column_mode = match value.to_lowercase().as_str() {
                        "text" => ColumnMode::Text,
                        "native" => ColumnMode::Native,
                        _ => {
                            return Err(SqliteError::config(format!(
                                "unknown column mode '{}'",
                                value
                            )));
                        }
                    };
                }
                _ => {}
            }
        }

        Ok(config)
    }

    /// The database path for display and error messages.
    pub fn path_str(&self) -> Cow<'_, str> {
        self.path.display()
    }

    /// Flags used to open the database: create if missing, read-write,
    /// and the serialized (full mutex) threading mode.
    pub fn open_flags(&self) -> OpenFlags {
        OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX
    }

    /// Generate the initialization SQL for this configuration.
    pub fn init_sql(&self) -> String {
        let mut sql = String::new();

        if self.foreign_keys {
            sql.push_str("PRAGMA foreign_keys = ON;\n");
        }

        if let Some(mode) = self.journal_mode {
            sql.push_str(&format!("PRAGMA journal_mode = {};\n", mode.as_pragma()));
        }

        if let Some(timeout) = self.busy_timeout_ms {
            sql.push_str(&format!("PRAGMA busy_timeout = {};\n", timeout));
        }

        sql
    }

    /// Set the database path.
    pub fn path(mut self, path: DatabasePath) -> Self {
        self.path = path;
        self
    }

    /// Enable or disable foreign keys.
    pub fn foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    /// Set the busy timeout in milliseconds.
    pub fn busy_timeout(mut self, ms: u32) -> Self {
        self.busy_timeout_ms = Some(ms);
        self
    }

    /// Set the journal mode.
    pub fn journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = Some(mode);
        self
    }

    /// Set the column materialization mode.
    pub fn column_mode(mut self, mode: ColumnMode) -> Self {
        self.column_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_memory() {
        let config = SqliteConfig::memory();
        assert!(config.path.is_memory());
        assert_eq!(config.path_str(), ":memory:");
        assert_eq!(config.column_mode, ColumnMode::Text);
    }

    #[test]
    fn test_config_file() {
        let config = SqliteConfig::file("test.db");
        assert!(!config.path.is_memory());
        assert_eq!(config.path_str(), "test.db");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_path_keeps_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = Path::new(OsStr::from_bytes(b"db\xff.sqlite"));
        let config = SqliteConfig::file(raw);
        assert!(!config.path.is_memory());
        assert_eq!(config.path.as_path(), raw);
        assert_eq!(config.path_str(), "db\u{FFFD}.sqlite");
    }

    #[test]
    fn test_from_url_memory() {
        assert!(SqliteConfig::from_url("sqlite::memory:").unwrap().path.is_memory());
        assert!(SqliteConfig::from_url(":memory:").unwrap().path.is_memory());
        assert!(SqliteConfig::from_url("sqlite::memory:?foreign_keys=1")
            .unwrap()
            .path
            .is_memory());
    }

    #[test]
    fn test_from_url_file_forms() {
        for url in ["sqlite://./test.db", "sqlite:./test.db", "file:./test.db", "./test.db"] {
            let config = SqliteConfig::from_url(url).unwrap();
            assert_eq!(config.path_str(), "./test.db", "url: {}", url);
        }
    }

    #[test]
    fn test_from_url_with_options() {
        let config = SqliteConfig::from_url(
            "sqlite://./test.db?foreign_keys=true&busy_timeout=10000&journal_mode=wal&columns=native",
        )
        .unwrap();

        assert!(config.foreign_keys);
        assert_eq!(config.busy_timeout_ms, Some(10000));
        assert_eq!(config.journal_mode, Some(JournalMode::Wal));
        assert_eq!(config.column_mode, ColumnMode::Native);
    }

    #[test]
    fn test_from_url_rejects_bad_input() {
        assert!(SqliteConfig::from_url("sqlite://").is_err());
        assert!(SqliteConfig::from_url("sqlite://db?busy_timeout=soon").is_err());
        assert!(SqliteConfig::from_url("sqlite://db?journal_mode=fast").is_err());
        assert!(SqliteConfig::from_url("sqlite://db?columns=binary").is_err());
    }

    #[test]
    fn test_init_sql() {
        assert_eq!(SqliteConfig::memory().init_sql(), "");

        let sql = SqliteConfig::memory()
            .foreign_keys(true)
            .journal_mode(JournalMode::Memory)
            .busy_timeout(3000)
            .init_sql();
        assert!(sql.contains("foreign_keys = ON"));
        assert!(sql.contains("journal_mode = MEMORY"));
        assert!(sql.contains("busy_timeout = 3000"));
    }

    #[test]
    fn test_open_flags() {
        let flags = SqliteConfig::memory().open_flags();
        assert!(flags.contains(OpenFlags::SQLITE_OPEN_CREATE));
        assert!(flags.contains(OpenFlags::SQLITE_OPEN_READ_WRITE));
        assert!(flags.contains(OpenFlags::SQLITE_OPEN_FULL_MUTEX));
        assert!(!flags.contains(OpenFlags::SQLITE_OPEN_NO_MUTEX));
    }
}
