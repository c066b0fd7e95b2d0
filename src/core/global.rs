//! Process-wide default logger
//!
//! A logger can be installed once with [`set_logger`]. Until then the free
//! functions here log through a console-only fallback.
//!
//! The installed logger lives in a static and is never dropped, so a process
//! that exits normally must call [`shutdown`] first to persist pending lines.
//!
//! ```no_run
//! use drain_logger::{global, Logger, LogLevel, DEFAULT_SHUTDOWN_TIMEOUT};
//!
//! let logger = Logger::new("logs/app.log").expect("log file");
//! global::set_logger(logger);
//! global::set_level(LogLevel::Debug);
//! global::info("ready");
//! global::shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
//! ```

use super::log_level::LogLevel;
use super::logger::Logger;
use std::sync::{LazyLock, OnceLock};
use std::time::Duration;

static INSTALLED: OnceLock<Logger> = OnceLock::new();
static FALLBACK: LazyLock<Logger> = LazyLock::new(Logger::console);

/// Install the process-wide logger.
///
/// Only the first call has an effect; later calls drop their logger (shutting
/// down its worker) and return `false`.
pub fn set_logger(logger: Logger) -> bool {
    INSTALLED.set(logger).is_ok()
}

/// The installed logger, or the console-only fallback
pub fn logger() -> &'static Logger {
    INSTALLED.get().unwrap_or_else(|| &*FALLBACK)
}

pub fn set_level(level: LogLevel) {
    logger().set_level(level);
}

pub fn level() -> LogLevel {
    logger().level()
}

/// Drain and flush the installed logger; see [`Logger::shutdown`].
///
/// Afterwards the installed logger keeps logging to the console only.
pub fn shutdown(timeout: Duration) -> bool {
    logger().shutdown(timeout)
}

#[track_caller]
pub fn debug(message: impl Into<String>) {
    logger().debug(message);
}

#[track_caller]
pub fn info(message: impl Into<String>) {
    logger().info(message);
}

#[track_caller]
pub fn warn(message: impl Into<String>) {
    logger().warn(message);
}

#[track_caller]
pub fn error(message: impl Into<String>) {
    logger().error(message);
}

#[track_caller]
pub fn fatal(message: impl Into<String>) -> ! {
    logger().fatal(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::{ConsoleTarget, MemorySink};

    // Single test so the one-time installation is observed in a known order.
    #[test]
    fn test_install_once() {
        let first = MemorySink::new();
        let second = MemorySink::new();
        let build = |sink: &MemorySink| {
            Logger::builder()
                .sink(sink.clone())
                .console(ConsoleTarget::Silent)
                .flush_interval(Duration::from_millis(10))
                .build()
                .unwrap()
        };

        assert!(set_logger(build(&first)));
        assert!(!set_logger(build(&second)));
        assert!(logger().is_file_backed());

        set_level(LogLevel::Warn);
        assert_eq!(level(), LogLevel::Warn);
        info("filtered out");
        warn("kept");

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while first.lines().is_empty() && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(first.lines().len(), 1);
        assert!(first.lines()[0].ends_with(": kept"));
        assert!(second.lines().is_empty());

        error("pending at shutdown");
        assert!(shutdown(Duration::from_secs(5)));
        assert!(!logger().is_file_backed());
        assert_eq!(first.lines().len(), 2);
        assert!(first.lines()[1].ends_with(": pending at shutdown"));
    }
}
