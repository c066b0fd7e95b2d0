//! Log entry structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};

/// One log event, created at the call site and consumed once by the formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    timestamp: DateTime<Local>,
    pid: u32,
    call_site: String,
    level: LogLevel,
    message: String,
}

impl LogEntry {
    /// Keep one event on one line: a message cannot forge extra log lines.
    fn sanitize_message(message: String) -> String {
        if message.contains(&['\n', '\r'][..]) {
            message.replace('\n', "\\n").replace('\r', "\\r")
        } else {
            message
        }
    }

    pub fn new(level: LogLevel, call_site: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            pid: std::process::id(),
            call_site: call_site.into(),
            level,
            message: Self::sanitize_message(message.into()),
        }
    }

    /// Replace the capture time, for reproducible rendering.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn call_site(&self) -> &str {
        &self.call_site
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
