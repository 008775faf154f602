//! Logging bootstrap for Lode.
//!
//! All Lode crates log through `tracing`. With the `tracing-subscriber`
//! feature enabled, [`init`] installs a global subscriber configured from
//! the environment:
//!
//! - `LODE_DEBUG=true|1|yes` - Enable debug logging
//! - `LODE_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `LODE_LOG_FORMAT=json|pretty|compact` - Output format (default: json)
//!
//! ```rust,no_run
//! use lode_query::logging::{self, LogFormat, LogSettings};
//!
//! logging::init();
//! // or, without touching the environment:
//! logging::init_with(LogSettings::new("trace").format(LogFormat::Compact));
//! ```

use std::env;

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human readable output.
    Pretty,
    /// Single-line human readable output.
    Compact,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "compact" => Self::Compact,
            _ => Self::Json,
        }
    }
}

/// Level and format for the Lode log targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Level applied to every `lode*` target.
    pub level: &'static str,
    /// Output format.
    pub format: LogFormat,
}

impl LogSettings {
    /// Settings at `level`, in the default format. Unknown levels become "warn".
    pub fn new(level: &str) -> Self {
        Self {
            level: parse_level(level).unwrap_or("warn"),
            format: LogFormat::default(),
        }
    }

    /// Set the output format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Read settings from the environment.
    ///
    /// Returns `None` when neither `LODE_DEBUG` nor `LODE_LOG_LEVEL` asks
    /// for logging.
    pub fn from_env() -> Option<Self> {
        let explicit = env::var("LODE_LOG_LEVEL").ok();
        if !is_debug_enabled() && explicit.is_none() {
            return None;
        }

        let fallback = if is_debug_enabled() { "debug" } else { "warn" };
        let level = explicit
            .as_deref()
            .and_then(parse_level)
            .unwrap_or(fallback);
        let format = env::var("LODE_LOG_FORMAT")
            .map(|f| LogFormat::parse(&f))
            .unwrap_or_default();

        Some(Self { level, format })
    }

    /// The filter directive covering every Lode crate.
    pub fn directive(&self) -> String {
        format!(
            "lode={level},lode_query={level},lode_sqlite={level}",
            level = self.level
        )
    }
}

fn parse_level(value: &str) -> Option<&'static str> {
    match value.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Check if debug logging is enabled via `LODE_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("LODE_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Install a subscriber configured from the environment.
///
/// Does nothing when the environment does not ask for logging. Returns
/// whether a subscriber was installed by this call.
pub fn init() -> bool {
    LogSettings::from_env().is_some_and(init_with)
}

/// Install a subscriber with explicit settings.
///
/// Returns `false` if a global subscriber is already set, or if the
/// `tracing-subscriber` feature is disabled.
pub fn init_with(settings: LogSettings) -> bool {
    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let filter =
            EnvFilter::try_new(settings.directive()).unwrap_or_else(|_| EnvFilter::new("warn"));
        let registry = tracing_subscriber::registry().with(filter);

        let installed = match settings.format {
            LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
            LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
            LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        }
        .is_ok();

        if installed {
            tracing::info!(level = settings.level, format = ?settings.format, "Lode logging initialized");
        }
        installed
    }

    #[cfg(not(feature = "tracing-subscriber"))]
    {
        let _ = settings;
        false
    }
}
