//! Tracing setup
//!
//! Logs go to stderr so stdout stays clean for JSON output.
//! `RUST_LOG` takes precedence over the level chosen on the command line.

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// CLI log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Warning and error messages
    #[default]
    Warn,
    /// Informational, warning, and error messages
    Info,
    /// Debug and above
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    pub fn as_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_tracing_level().to_string()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(LogLevel::Warn.as_tracing_level(), Level::WARN);
        assert_eq!(LogLevel::Trace.as_tracing_level(), Level::TRACE);
        assert_eq!(LogLevel::default(), LogLevel::Warn);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(LogLevel::Error);
        init(LogLevel::Debug);
    }
}
