//! Logger configuration
//!
//! A [`LoggerConfig`] can be built in code, through [`LoggerBuilder`](super::LoggerBuilder),
//! or loaded from JSON:
//!
//! ```
//! use drain_logger::{LogLevel, LoggerConfig};
//!
//! let config = LoggerConfig::from_json_str(r#"{ "level": "DEBUG", "path": "logs/app.log" }"#)
//!     .unwrap();
//! assert_eq!(config.level, LogLevel::Debug);
//! assert_eq!(config.queue_capacity, 10_000);
//! ```

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Bounded queue capacity between producers and the drain worker
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

/// Pending lines that force an immediate flush
pub const DEFAULT_HIGH_WATER_MARK: usize = 100;

/// Periodic flush interval in milliseconds
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 1_000;

/// Days a rotated file is kept before it is deleted
pub const DEFAULT_MAX_AGE_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Minimum level that is emitted
    pub level: LogLevel,
    /// Base path of the rotating log file; `None` or empty means console only
    pub path: Option<PathBuf>,
    pub queue_capacity: usize,
    pub high_water_mark: usize,
    pub flush_interval_ms: u64,
    pub max_age_days: u32,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            path: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            high_water_mark: DEFAULT_HIGH_WATER_MARK,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
        }
    }
}

impl LoggerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&json)
    }

    /// File destination, treating an empty path as absent.
    pub fn file_path(&self) -> Option<&Path> {
        self.path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(LoggerError::config("LoggerConfig", "queue_capacity must be positive"));
        }
        if self.high_water_mark == 0 {
            return Err(LoggerError::config("LoggerConfig", "high_water_mark must be positive"));
        }
        if self.flush_interval_ms == 0 {
            return Err(LoggerError::config("LoggerConfig", "flush_interval_ms must be positive"));
        }
        if self.max_age_days == 0 {
            return Err(LoggerError::config("LoggerConfig", "max_age_days must be positive"));
        }
        Ok(())
    }
}
