//! Core logger types and traits

pub mod config;
pub mod error;
pub mod format;
pub mod global;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod sink;
pub mod worker;

pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
pub use sink::Sink;
pub use worker::{WorkerExit, FATAL_EXIT_CODE};
