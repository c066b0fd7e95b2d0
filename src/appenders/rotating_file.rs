//! Daily rotating file sink
//!
//! Each calendar day (local time) gets its own file. The date is embedded
//! between the stem and the extension of the configured base path:
//!
//! ```text
//! logs/app.log  ->  logs/app.2025-01-08.log, logs/app.2025-01-09.log, ...
//! logs/app      ->  logs/app.2025-01-08, ...
//! ```
//!
//! Files whose embedded date falls outside the retention window are deleted
//! when the sink opens and whenever it rotates.

use crate::core::error::{LoggerError, Result};
use crate::core::sink::Sink;
use chrono::{Days, Local, NaiveDate};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default retention window in days
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// # Examples
///
/// ```no_run
/// use drain_logger::appenders::RotatingFileSink;
///
/// // Keep a week of daily files next to /var/log/app.log
/// let sink = RotatingFileSink::with_retention("/var/log/app.log", 7).unwrap();
/// ```
pub struct RotatingFileSink {
    base_path: PathBuf,
    directory: PathBuf,
    stem: String,
    extension: String,
    retention_days: u32,
    current_date: NaiveDate,
    writer: Option<BufWriter<File>>,
}

impl RotatingFileSink {
    /// Open today's file with the default 30 day retention
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_retention(path, DEFAULT_RETENTION_DAYS)
    }

    /// Open today's file, keeping `retention_days` days of history
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created
    pub fn with_retention(path: impl AsRef<Path>, retention_days: u32) -> Result<Self> {
        Self::open_at(path.as_ref(), retention_days, Local::now().date_naive())
    }

    pub(crate) fn open_at(path: &Path, retention_days: u32, today: NaiveDate) -> Result<Self> {
        let base_path = path.to_path_buf();
        let stem = base_path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                LoggerError::config(
                    "RotatingFileSink",
                    format!("'{}' does not name a file", base_path.display()),
                )
            })?
            .to_string();
        let extension = base_path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();
        let directory = match base_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        fs::create_dir_all(&directory).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", directory.display()),
                e,
            )
        })?;

        let mut sink = Self {
            base_path,
            directory,
            stem,
            extension,
            retention_days,
            current_date: today,
            writer: None,
        };
        sink.writer = Some(sink.open_file(today)?);
        sink.prune(today);
        Ok(sink)
    }

    /// Path of the file holding entries for `date`
    #[must_use]
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.directory.join(format!(
            "{}.{}{}",
            self.stem,
            date.format(DATE_FORMAT),
            self.extension
        ))
    }

    /// Path of the file currently written to
    #[must_use]
    pub fn current_path(&self) -> PathBuf {
        self.path_for(self.current_date)
    }

    /// Configured base path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn retention_days(&self) -> u32 {
        self.retention_days
    }

    fn open_file(&self, date: NaiveDate) -> Result<BufWriter<File>> {
        let path = self.path_for(date);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
            })?;
        Ok(BufWriter::new(file))
    }

    /// Switch to the file for `date`.
    ///
    /// The old writer is closed first; if the new file cannot be opened the
    /// sink stays without a writer and the next append tries again.
    fn rotate(&mut self, date: NaiveDate) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.flush() {
                eprintln!(
                    "[LOGGER WARNING] Failed to flush {} before rotation: {}",
                    self.current_path().display(),
                    e
                );
            }
        }

        let writer = self.open_file(date).map_err(|e| {
            LoggerError::file_rotation(self.path_for(date).display().to_string(), e.to_string())
        })?;
        self.writer = Some(writer);
        self.current_date = date;
        self.prune(date);
        Ok(())
    }

    /// Extract the date embedded in a file name produced by this sink
    fn embedded_date(&self, file_name: &str) -> Option<NaiveDate> {
        let date = file_name
            .strip_prefix(self.stem.as_str())?
            .strip_prefix('.')?
            .strip_suffix(self.extension.as_str())?;
        NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
    }

    /// Delete files older than the retention window, returning how many went
    fn prune(&self, today: NaiveDate) -> usize {
        let Some(cutoff) = today.checked_sub_days(Days::new(u64::from(self.retention_days))) else {
            return 0;
        };

        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!(
                    "[LOGGER WARNING] Cannot scan {} for expired logs: {}",
                    self.directory.display(),
                    e
                );
                return 0;
            }
        };

        let mut removed = 0;
        for entry in entries.filter_map(|entry| entry.ok()) {
            let file_name = entry.file_name();
            let Some(date) = file_name.to_str().and_then(|name| self.embedded_date(name)) else {
                continue;
            };
            if date >= cutoff {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => removed += 1,
                Err(e) => eprintln!(
                    "[LOGGER WARNING] Failed to remove expired log {}: {}",
                    entry.path().display(),
                    e
                ),
            }
        }
        removed
    }

    pub(crate) fn append_on(&mut self, date: NaiveDate, block: &[u8]) -> Result<()> {
        if self.writer.is_none() || date != self.current_date {
            self.rotate(date)?;
        }

        let path = self.current_path();
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::file_appender(path.display().to_string(), "Writer not initialized"))?;

        writer
            .write_all(block)
            .and_then(|()| writer.flush())
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Failed to write log block: {}", e),
                )
            })
    }
}

impl Sink for RotatingFileSink {
    fn append(&mut self, block: &[u8]) -> Result<()> {
        self.append_on(Local::now().date_naive(), block)
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rotating_file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
