//! Logging configuration for hotprospects.
//!
//! Every recovered failure in the app (unreadable saves, failed writes,
//! rejected scans, refused permissions) is reported only through these logs,
//! which go to stderr so command output on stdout stays clean.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Suppress all output except errors.
    Quiet,
    /// Normal output level (info and above).
    #[default]
    Normal,
    /// Verbose output (debug and above).
    Verbose,
    /// Very verbose output (trace level).
    Trace,
}

impl Verbosity {
    /// Filter directives used when `RUST_LOG` is not set.
    ///
    /// Dependencies stay at `warn` unless everything is quieted.
    #[must_use]
    pub fn directives(self) -> String {
        let own = match self {
            Self::Quiet => return "error".to_string(),
            Self::Normal => "info",
            Self::Verbose => "debug",
            Self::Trace => "trace",
        };
        format!("warn,hotprospects={own}")
    }
}

/// Build the event filter from an optional `RUST_LOG` value.
///
/// A value that does not parse is ignored in favour of the verbosity
/// defaults.
#[must_use]
pub fn build_filter(verbosity: Verbosity, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity.directives()))
}

/// Initialize the logging system.
///
/// Call once at startup. `RUST_LOG` takes precedence over `verbosity`.
/// Targets and source locations are only shown when asking for more detail.
///
/// # Examples
///
/// ```no_run
/// use hotprospects::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    // RUST_LOG wins when it parses
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = build_filter(verbosity, rust_log.as_deref());

    // Keep normal output terse; -v adds targets, -vv adds file and line
    let detailed = verbosity >= Verbosity::Verbose;
    let located = verbosity == Verbosity::Trace;
    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(detailed)
            .with_file(located)
            .with_line_number(located),
    );

    // A subscriber may already be installed (tests, embedding)
    let _ = subscriber.try_init();
}

/// Initialize logging for tests.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn test_verbosity_ordering() {
        assert!(Verbosity::Quiet < Verbosity::Normal);
        assert!(Verbosity::Verbose < Verbosity::Trace);
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    #[test]
    fn test_directives() {
        assert_eq!(Verbosity::Quiet.directives(), "error");
        assert_eq!(Verbosity::Normal.directives(), "warn,hotprospects=info");
        assert_eq!(Verbosity::Verbose.directives(), "warn,hotprospects=debug");
        assert_eq!(Verbosity::Trace.directives(), "warn,hotprospects=trace");
    }

    #[test]
    fn test_build_filter_defaults() {
        let filter = build_filter(Verbosity::Verbose, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_build_filter_prefers_rust_log() {
        let filter = build_filter(Verbosity::Quiet, Some("hotprospects=trace"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_build_filter_ignores_blank_rust_log() {
        let filter = build_filter(Verbosity::Normal, Some("  "));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_build_filter_quiet() {
        let filter = build_filter(Verbosity::Quiet, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn test_init_logging_with_all_verbosity_levels() {
        // Only the first call installs a subscriber.
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Normal);
        init_logging(Verbosity::Verbose);
        init_logging(Verbosity::Trace);
    }
}
