//! Logging macros for ergonomic log message formatting.
//!
//! With format arguments the message is built with `format!`, and only after
//! the level gate lets the event through. A lone message is passed through
//! verbatim, so `info!(logger, "100% done {}")` logs exactly that text.
//!
//! # Examples
//!
//! ```
//! use drain_logger::prelude::*;
//! use drain_logger::info;
//!
//! let logger = Logger::console();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at the given level.
///
/// # Examples
///
/// ```
/// # use drain_logger::prelude::*;
/// # let logger = Logger::console();
/// use drain_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $message:expr $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(level, $message)
        }
    }};
    ($logger:expr, $level:expr, $fmt:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(level, ::std::format!($fmt, $($arg)+))
        }
    }};
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use drain_logger::prelude::*;
/// # let logger = Logger::console();
/// use drain_logger::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use drain_logger::prelude::*;
/// # let logger = Logger::console();
/// use drain_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use drain_logger::prelude::*;
/// # let logger = Logger::console();
/// use drain_logger::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use drain_logger::prelude::*;
/// # let logger = Logger::console();
/// use drain_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message and terminate the process.
///
/// # Examples
///
/// ```no_run
/// # use drain_logger::prelude::*;
/// # let logger = Logger::console();
/// use drain_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $message:expr $(,)?) => {
        $logger.fatal($message)
    };
    ($logger:expr, $fmt:expr, $($arg:tt)+) => {
        $logger.fatal(::std::format!($fmt, $($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::{ConsoleTarget, MemorySink};
    use crate::core::{LogLevel, Logger, DEFAULT_SHUTDOWN_TIMEOUT};
    use std::time::Duration;

    fn memory_logger(sink: &MemorySink) -> Logger {
        Logger::builder()
            .level(LogLevel::Debug)
            .sink(sink.clone())
            .console(ConsoleTarget::Silent)
            .flush_interval(Duration::from_secs(3600))
            .build()
            .unwrap()
    }

    #[test]
    fn test_level_macros() {
        let sink = MemorySink::new();
        let logger = memory_logger(&sink);

        debug!(logger, "Debug message");
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        log!(logger, LogLevel::Info, "Formatted: {}", 42);

        logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        let lines = sink.lines();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].ends_with(": Debug message"));
        assert!(lines[1].ends_with(": Items: 100"));
        assert!(lines[2].ends_with(": Retry 1 of 3"));
        assert!(lines[3].ends_with(": Code: 500"));
        assert!(lines[4].ends_with(": Formatted: 42"));
    }

    #[test]
    fn test_message_without_arguments_is_verbatim() {
        let sink = MemorySink::new();
        let logger = memory_logger(&sink);

        info!(logger, "100% done {}");

        logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        assert!(sink.lines()[0].ends_with(": 100% done {}"));
    }

    #[test]
    fn test_disabled_level_skips_formatting() {
        struct Explosive;

        impl std::fmt::Display for Explosive {
            fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                panic!("formatted a disabled event");
            }
        }

        let sink = MemorySink::new();
        let logger = memory_logger(&sink);
        logger.set_level(LogLevel::Error);
        debug!(logger, "value: {}", Explosive);
    }

    #[test]
    fn test_logger_expression_evaluated_once() {
        use std::cell::Cell;

        fn counted<'a>(logger: &'a Logger, lookups: &Cell<u32>) -> &'a Logger {
            lookups.set(lookups.get() + 1);
            logger
        }

        let sink = MemorySink::new();
        let logger = memory_logger(&sink);
        logger.set_level(LogLevel::Info);
        let lookups = Cell::new(0);

        info!(counted(&logger, &lookups), "plain");
        warn!(counted(&logger, &lookups), "value {}", 1);
        debug!(counted(&logger, &lookups), "filtered {}", 2);
        assert_eq!(lookups.get(), 3);

        logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        assert_eq!(sink.lines().len(), 2);
    }

    #[test]
    fn test_macro_call_site_is_invocation_line() {
        let sink = MemorySink::new();
        let logger = memory_logger(&sink);

        let line = line!() + 1;
        info!(logger, "located");

        logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        assert!(sink.lines()[0].contains(&format!("{}:{}", file!(), line)));
    }
}
