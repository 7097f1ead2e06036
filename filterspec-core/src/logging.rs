//! Logging setup for filterspec.
//!
//! Every crate in the workspace logs through `tracing`. Handlers emit `debug!`
//! events for the fragments they build, the pipeline logs when its chain is
//! built, and the specification engine logs per-field failures at `error!`.
//! This module installs a subscriber when the application has none.
//!
//! # Environment Variables
//!
//! - `FILTERSPEC_DEBUG=true|1|yes` - Enable debug logging
//! - `FILTERSPEC_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `FILTERSPEC_LOG_FORMAT=json|pretty|compact` - Output format (default: json)
//!
//! ```rust,no_run
//! use filterspec_core::logging;
//!
//! logging::init();
//! ```

use std::env;
use std::fmt;
use std::sync::Once;

static INIT: Once = Once::new();

/// Enables debug logging.
pub const DEBUG_ENV: &str = "FILTERSPEC_DEBUG";
/// Overrides the log level.
pub const LOG_LEVEL_ENV: &str = "FILTERSPEC_LOG_LEVEL";
/// Selects the output format.
pub const LOG_FORMAT_ENV: &str = "FILTERSPEC_LOG_FORMAT";

/// Subscriber output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Multi-line human readable output.
    Pretty,
    /// Single-line human readable output.
    Compact,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check if `FILTERSPEC_DEBUG` is set to "true", "1" or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var(DEBUG_ENV)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// The configured log level.
///
/// `FILTERSPEC_LOG_LEVEL` wins when it names a known level. Otherwise the
/// level is "debug" with `FILTERSPEC_DEBUG` and "warn" without.
pub fn log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var(LOG_LEVEL_ENV) {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// The configured output format, JSON unless `FILTERSPEC_LOG_FORMAT` says otherwise.
pub fn log_format() -> LogFormat {
    env::var(LOG_FORMAT_ENV)
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Json,
        })
        .unwrap_or(LogFormat::Json)
}

/// The `EnvFilter` directive covering every filterspec crate at `level`.
pub fn filter_directive(level: &str) -> String {
    ["filterspec", "filterspec_core", "filterspec_memory", "filterspec_sql", "filterspec_search"]
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. Later calls are no-ops.
///
/// Nothing is installed unless `FILTERSPEC_DEBUG` or `FILTERSPEC_LOG_LEVEL`
/// is set, or without the `tracing-subscriber` feature.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var(LOG_LEVEL_ENV).is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = log_level();
            let filter = EnvFilter::try_new(filter_directive(level))
                .unwrap_or_else(|_| EnvFilter::new("warn"));
            let registry = tracing_subscriber::registry().with(filter);

            // try_init: the application may already own the global subscriber
            let installed = match log_format() {
                LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
                LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
                LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
            };

            if installed.is_ok() {
                tracing::info!(level, format = %log_format(), "filterspec logging initialized");
            }
        }
    });
}

/// Set `FILTERSPEC_LOG_LEVEL` and initialize.
///
/// # Safety
///
/// This function modifies environment variables, which is unsafe in
/// multi-threaded programs. Call it at startup before spawning threads.
pub fn init_with_level(level: &str) {
    // SAFETY: documented as startup-only, before other threads exist.
    unsafe {
        env::set_var(LOG_LEVEL_ENV, level);
    }
    init();
}

/// Set `FILTERSPEC_DEBUG=true` and initialize.
///
/// # Safety
///
/// This function modifies environment variables, which is unsafe in
/// multi-threaded programs. Call it at startup before spawning threads.
pub fn init_debug() {
    // SAFETY: documented as startup-only, before other threads exist.
    unsafe {
        env::set_var(DEBUG_ENV, "true");
    }
    init();
}
