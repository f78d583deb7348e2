//! Logging helpers for applications embedding fob-html.
//!
//! Only available with the `logging` feature. The library itself just emits
//! `tracing` events; libraries embedding it should leave subscriber setup to
//! their own callers.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Crates whose events are shown at the chosen level.
const TARGETS: [&str; 2] = ["fob_html", "fob_html_config"];

/// Verbosity of fob-html output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    /// Emitted artifacts (default)
    #[default]
    Info,
    /// Skip reasons, changed chunks, chunk order
    Debug,
    /// Ignored parent edges
    Trace,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Filter directives scoping `self` to the fob-html crates.
    fn directives(&self) -> String {
        TARGETS
            .iter()
            .map(|target| format!("{}={}", target, self.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn install(filter: EnvFilter) {
    INIT.call_once(|| {
        // Another subscriber may already be installed by the host application.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false).without_time())
            .try_init();
    });
}

/// Install a global subscriber showing fob-html events at `level`.
///
/// Only the first call in a process has an effect.
///
/// ```rust,no_run
/// use fob_html::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Debug);
/// ```
pub fn init_logging(level: LogLevel) {
    install(EnvFilter::new(level.directives()));
}

/// Install a global subscriber configured from `RUST_LOG`, falling back to
/// [`LogLevel::Info`] for the fob-html crates.
pub fn init_logging_from_env() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(LogLevel::Info.directives()));
    install(filter);
}
