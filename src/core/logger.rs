//! Main logger implementation

use super::{
    config::LoggerConfig,
    error::Result,
    format,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    sink::Sink,
    worker::{self, Control, DrainWorker, FATAL_EXIT_CODE},
};
use crate::appenders::{ConsoleTarget, RotatingFileSink};
use crossbeam_channel::{bounded, Sender};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// This timeout is used when the logger is dropped without explicit shutdown.
/// For custom timeout control, use the `shutdown()` method instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// How often a fatal caller checks whether the worker ended without exiting
const FATAL_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Producer-side handles to a running drain worker
struct Drain {
    queue: Sender<String>,
    control: Sender<Control>,
    fatal_sent: AtomicBool,
    stopped: AtomicBool,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Drain {
    fn start(
        sink: Box<dyn Sink>,
        config: &LoggerConfig,
        metrics: &Arc<LoggerMetrics>,
    ) -> Result<Self> {
        let (queue, queue_rx) = bounded(config.queue_capacity);
        let (control, control_rx) = bounded(1);
        let worker = DrainWorker::new(
            sink,
            queue_rx,
            control_rx,
            config.flush_interval(),
            config.high_water_mark,
            Arc::clone(metrics),
        );
        let handle = worker::spawn(worker)?;

        Ok(Self {
            queue,
            control,
            fatal_sent: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            handle: Mutex::new(Some(handle)),
        })
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn worker_finished(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    /// Ask the worker to drain and terminate the process, then wait for it.
    fn terminate(&self) -> ! {
        if !self.fatal_sent.swap(true, Ordering::SeqCst)
            && self.control.send(Control::Fatal).is_err()
        {
            if !self.is_stopped() {
                eprintln!("[LOGGER ERROR] Drain worker is gone; exiting without draining");
            }
            std::process::exit(FATAL_EXIT_CODE);
        }
        loop {
            thread::park_timeout(FATAL_POLL_INTERVAL);
            // A concurrent shutdown ended the worker before it read the fatal signal
            if self.worker_finished() {
                std::process::exit(FATAL_EXIT_CODE);
            }
        }
    }

    /// Ask the worker to drain and stop, then wait up to `timeout` for it.
    fn stop(&self, timeout: Duration, metrics: &LoggerMetrics) -> bool {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            // Full only when a fatal signal is pending; the worker ends either way.
            let _ = self.control.try_send(Control::Shutdown);
        }

        let start = Instant::now();
        loop {
            {
                let mut handle = self.handle.lock();
                let finished = match handle.as_ref() {
                    None => return true,
                    Some(h) => h.is_finished(),
                };
                if finished {
                    if let Some(Err(e)) = handle.take().map(thread::JoinHandle::join) {
                        eprintln!("[LOGGER ERROR] Drain worker panicked during shutdown: {:?}", e);
                        return false;
                    }
                    return true;
                }
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Drain worker did not finish within {:?}. \
                     {} queued lines may be lost.",
                    timeout,
                    metrics.in_flight()
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

/// Leveled logger with a colored console copy and an optional buffered file copy.
///
/// Console lines are written synchronously by the calling thread. When a file
/// destination is configured, the plain line is also queued for a background
/// worker that batches lines and appends them to a daily rotating file.
///
/// # Example
///
/// ```no_run
/// use drain_logger::prelude::*;
///
/// let logger = Logger::new("logs/app.log")?;
/// logger.set_level(LogLevel::Debug);
/// logger.info("Server started");
/// # Ok::<(), drain_logger::LoggerError>(())
/// ```
pub struct Logger {
    min_level: RwLock<LogLevel>,
    console: ConsoleTarget,
    drain: Option<Drain>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Create a console-only logger.
    ///
    /// No worker is spawned; a fatal event exits the process immediately.
    #[must_use]
    pub fn console() -> Self {
        Self {
            min_level: RwLock::new(LogLevel::Info),
            console: ConsoleTarget::Stdout,
            drain: None,
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    /// Create a logger persisting to a daily rotating file at `path`.
    ///
    /// An empty path yields a console-only logger.
    ///
    /// # Errors
    ///
    /// Returns error if the log file cannot be opened or the worker cannot start
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::builder().path(path).build()
    }

    /// Create a logger from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the log file cannot be opened
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        Self::builder().config(config.clone()).build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use drain_logger::prelude::*;
    /// use std::time::Duration;
    ///
    /// let logger = Logger::builder()
    ///     .level(LogLevel::Debug)
    ///     .sink(MemorySink::new())
    ///     .high_water_mark(50)
    ///     .flush_interval(Duration::from_millis(500))
    ///     .build()
    ///     .unwrap();
    /// assert!(logger.is_file_backed());
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn level(&self) -> LogLevel {
        *self.min_level.read()
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.min_level.read().allows(level)
    }

    /// Whether a drain worker persists lines for this logger
    pub fn is_file_backed(&self) -> bool {
        self.active_drain().is_some()
    }

    fn active_drain(&self) -> Option<&Drain> {
        self.drain.as_ref().filter(|drain| !drain.is_stopped())
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Log `message` at `level`, attributing it to the caller's source location.
    ///
    /// A `Fatal` event never returns: see [`Logger::fatal`].
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }
        let call_site = format::call_site(Location::caller());
        self.dispatch(LogEntry::new(level, call_site, message));
    }

    /// Log with an explicit call-site string instead of the caller's location.
    pub fn log_at(&self, level: LogLevel, call_site: &str, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }
        self.dispatch(LogEntry::new(level, call_site, message));
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Log a fatal event and terminate the process.
    ///
    /// With a file destination the worker drains every queued line, flushes,
    /// and exits with status 1 while this thread blocks. Without one the
    /// process exits right after the console write.
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) -> ! {
        let call_site = format::call_site(Location::caller());
        let entry = LogEntry::new(LogLevel::Fatal, call_site, message);
        self.emit(&entry);
        self.terminate()
    }

    fn dispatch(&self, entry: LogEntry) {
        self.emit(&entry);
        if entry.level() == LogLevel::Fatal {
            self.terminate();
        }
    }

    /// Console write, then hand the plain line to the worker.
    ///
    /// The enqueue blocks while the queue is full.
    fn emit(&self, entry: &LogEntry) {
        self.console.write_line(&format::console_line(entry));
        self.metrics.record_logged();

        if let Some(drain) = self.active_drain() {
            match drain.queue.send(format::file_line(entry)) {
                Ok(()) => {
                    self.metrics.record_enqueued();
                }
                Err(_) => {
                    eprintln!("[LOGGER WARNING] Drain worker stopped; line not persisted");
                }
            }
        }
    }

    fn terminate(&self) -> ! {
        match self.drain {
            Some(ref drain) => drain.terminate(),
            None => std::process::exit(FATAL_EXIT_CODE),
        }
    }

    /// Gracefully shutdown the logger with a custom timeout
    ///
    /// Queued lines are drained and flushed, then the worker thread ends. The
    /// logger keeps working afterwards as a console-only logger. Takes `&self`
    /// so a logger shared through an `Arc` or installed globally can be flushed
    /// before the process exits.
    ///
    /// **Note**: When the logger is dropped without calling `shutdown()` explicitly,
    /// it uses [`DEFAULT_SHUTDOWN_TIMEOUT`] (5 seconds).
    ///
    /// # Returns
    ///
    /// `true` if shutdown completed successfully within timeout, `false` otherwise
    pub fn shutdown(&self, timeout: Duration) -> bool {
        match self.drain {
            Some(ref drain) => drain.stop(timeout, &self.metrics),
            None => true,
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::console()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("console", &self.console)
            .field("file_backed", &self.is_file_backed())
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```no_run
/// use drain_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .path("logs/app.log")
///     .max_age_days(7)
///     .build()?;
/// # Ok::<(), drain_logger::LoggerError>(())
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    sink: Option<Box<dyn Sink>>,
    console: ConsoleTarget,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            sink: None,
            console: ConsoleTarget::Stdout,
        }
    }

    /// Replace every setting with `config`
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Persist to a daily rotating file at `path`; empty means console only
    #[must_use = "builder methods return a new value"]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = Some(path.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn high_water_mark(mut self, lines: usize) -> Self {
        self.config.high_water_mark = lines;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.flush_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_age_days(mut self, days: u32) -> Self {
        self.config.max_age_days = days;
        self
    }

    /// Persist through a custom sink instead of a rotating file
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console(mut self, target: ConsoleTarget) -> Self {
        self.console = target;
        self
    }

    /// Build the Logger, opening the file and starting the worker when needed
    ///
    /// # Errors
    ///
    /// Returns error on invalid configuration, when the destination cannot be
    /// opened, or when the worker thread cannot be spawned
    pub fn build(self) -> Result<Logger> {
        let Self {
            config,
            sink,
            console,
        } = self;
        config.validate()?;

        let sink: Option<Box<dyn Sink>> = match (sink, config.file_path()) {
            (Some(sink), _) => Some(sink),
            (None, Some(path)) => Some(Box::new(RotatingFileSink::with_retention(
                path,
                config.max_age_days,
            )?)),
            (None, None) => None,
        };

        let metrics = Arc::new(LoggerMetrics::new());
        let drain = match sink {
            Some(sink) => Some(Drain::start(sink, &config, &metrics)?),
            None => None,
        };

        Ok(Logger {
            min_level: RwLock::new(config.level),
            console,
            drain,
            metrics,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
