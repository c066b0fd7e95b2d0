//! # Drain Logger
//!
//! A leveled logger that prints a colored line to standard output for every
//! event and, when a file destination is configured, persists a plain copy
//! through a background worker into a daily rotating file.
//!
//! ## Features
//!
//! - **Synchronous console**: every enabled event is on stdout before the call returns
//! - **Batched file output**: lines are flushed every second or every 100 lines
//! - **Backpressure**: producers block on a full queue instead of dropping lines
//! - **Drain on fatal**: a fatal event flushes every queued line before the process exits
//! - **Daily rotation**: one file per day, files older than 30 days are removed

pub mod appenders;
pub mod core;
pub mod macros;

pub use crate::core::global;

pub mod prelude {
    pub use crate::appenders::{ConsoleTarget, MemorySink, RotatingFileSink};
    pub use crate::core::{
        LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
        Result, Sink, DEFAULT_SHUTDOWN_TIMEOUT,
    };
}

pub use crate::appenders::{ConsoleTarget, MemorySink, RotatingFileSink};
pub use crate::core::{
    LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Result,
    Sink, WorkerExit, DEFAULT_SHUTDOWN_TIMEOUT, FATAL_EXIT_CODE,
};
