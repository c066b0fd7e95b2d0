//! Background drain worker
//!
//! The worker is the only owner of the pending buffer. Producers reach it
//! through a bounded queue of rendered file lines; the logger reaches it
//! through a small control channel. A periodic tick flushes whatever is
//! pending.
//!
//! ```text
//!            line          ┌──────────┐   Fatal / Shutdown / disconnect   ┌──────────┐
//!   queue ───────────────▶ │ Running  │ ────────────────────────────────▶ │ Draining │ ──▶ exit
//!   tick  ── flush ──────▶ └──────────┘        (flush first)              └──────────┘
//! ```
//!
//! While draining the queue is polled without blocking; the first time it is
//! empty the buffer is flushed one last time and the worker returns. A line
//! enqueued after that point is not persisted.

use super::error::{LoggerError, Result};
use super::metrics::LoggerMetrics;
use super::sink::Sink;
use crossbeam_channel::{select, tick, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Exit status used when a fatal event terminates the process
pub const FATAL_EXIT_CODE: i32 = 1;

const WORKER_THREAD_NAME: &str = "drain-logger";

/// Out-of-band requests from the logger to its worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    /// Drain, flush, then terminate the process
    Fatal,
    /// Drain, flush, then stop the worker thread
    Shutdown,
}

/// Why [`DrainWorker::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    Fatal,
    Shutdown,
    /// Every producer handle was dropped
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    Running,
    Draining(WorkerExit),
}

enum Event {
    Line(String),
    Tick,
    Control(Control),
    Disconnected,
}

pub(crate) struct DrainWorker {
    sink: Box<dyn Sink>,
    queue: Receiver<String>,
    control: Receiver<Control>,
    ticker: Receiver<Instant>,
    pending: Vec<String>,
    high_water_mark: usize,
    metrics: Arc<LoggerMetrics>,
}

impl DrainWorker {
    pub(crate) fn new(
        sink: Box<dyn Sink>,
        queue: Receiver<String>,
        control: Receiver<Control>,
        flush_interval: Duration,
        high_water_mark: usize,
        metrics: Arc<LoggerMetrics>,
    ) -> Self {
        Self {
            sink,
            queue,
            control,
            ticker: tick(flush_interval),
            pending: Vec::with_capacity(high_water_mark),
            high_water_mark: high_water_mark.max(1),
            metrics,
        }
    }

    /// Run the state machine until a control message or disconnect ends it.
    ///
    /// The ticker is dropped with the worker, so the timer does not outlive it.
    pub(crate) fn run(mut self) -> WorkerExit {
        let mut state = WorkerState::Running;
        loop {
            state = match state {
                WorkerState::Running => self.step(),
                WorkerState::Draining(exit) => {
                    self.drain();
                    if let Err(e) = self.sink.flush() {
                        eprintln!("[LOGGER ERROR] Sink '{}' final flush failed: {}", self.sink.name(), e);
                    }
                    return exit;
                }
            };
        }
    }

    fn next_event(&self) -> Event {
        select! {
            recv(self.queue) -> line => match line {
                Ok(line) => Event::Line(line),
                Err(_) => Event::Disconnected,
            },
            recv(self.ticker) -> _ => Event::Tick,
            recv(self.control) -> signal => match signal {
                Ok(signal) => Event::Control(signal),
                Err(_) => Event::Disconnected,
            },
        }
    }

    fn step(&mut self) -> WorkerState {
        match self.next_event() {
            Event::Line(line) => {
                self.push(line);
                WorkerState::Running
            }
            Event::Tick => {
                self.flush();
                WorkerState::Running
            }
            Event::Control(signal) => {
                self.flush();
                match signal {
                    Control::Fatal => WorkerState::Draining(WorkerExit::Fatal),
                    Control::Shutdown => WorkerState::Draining(WorkerExit::Shutdown),
                }
            }
            Event::Disconnected => WorkerState::Draining(WorkerExit::Disconnected),
        }
    }

    /// Pull every line that is immediately available, then flush.
    fn drain(&mut self) {
        loop {
            match self.queue.try_recv() {
                Ok(line) => self.push(line),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.flush();
    }

    fn push(&mut self, line: String) {
        self.pending.push(line);
        if self.pending.len() >= self.high_water_mark {
            self.flush();
        }
    }

    /// Hand the pending lines to the sink as one block.
    ///
    /// An empty buffer never reaches the sink. A failed write is reported on
    /// stderr and its lines are dropped.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let lines = std::mem::replace(&mut self.pending, Vec::with_capacity(self.high_water_mark));
        let mut block = lines.join("\n");
        block.push('\n');

        match self.sink.append(block.as_bytes()) {
            Ok(()) => self.metrics.record_flush(lines.len()),
            Err(e) => {
                let failures = self.metrics.record_failed_flush(lines.len()) + 1;
                eprintln!(
                    "[LOGGER ERROR] Sink '{}' failed to persist {} lines (failure #{}): {}",
                    self.sink.name(),
                    lines.len(),
                    failures,
                    e
                );
            }
        }
    }
}

/// Start the worker on its own thread.
///
/// A fatal exit terminates the process with [`FATAL_EXIT_CODE`] once the
/// final flush is done.
pub(crate) fn spawn(worker: DrainWorker) -> Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || {
            if worker.run() == WorkerExit::Fatal {
                std::process::exit(FATAL_EXIT_CODE);
            }
        })
        .map_err(|e| LoggerError::io_operation("spawning drain worker", "thread creation failed", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemorySink;
    use crossbeam_channel::{bounded, Sender};

    const HOUR: Duration = Duration::from_secs(3600);

    struct Harness {
        queue: Sender<String>,
        control: Sender<Control>,
        sink: MemorySink,
        metrics: Arc<LoggerMetrics>,
        worker: DrainWorker,
    }

    fn harness(flush_interval: Duration, high_water_mark: usize) -> Harness {
        let (queue, queue_rx) = bounded(1000);
        let (control, control_rx) = bounded(1);
        let sink = MemorySink::new();
        let metrics = Arc::new(LoggerMetrics::new());
        let worker = DrainWorker::new(
            Box::new(sink.clone()),
            queue_rx,
            control_rx,
            flush_interval,
            high_water_mark,
            Arc::clone(&metrics),
        );
        Harness {
            queue,
            control,
            sink,
            metrics,
            worker,
        }
    }

    fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        condition()
    }

    #[test]
    fn test_shutdown_with_empty_buffer_never_writes() {
        let h = harness(HOUR, 100);
        h.control.send(Control::Shutdown).unwrap();

        assert_eq!(h.worker.run(), WorkerExit::Shutdown);
        assert_eq!(h.sink.block_count(), 0);
        assert_eq!(h.metrics.flushes(), 0);
    }

    #[test]
    fn test_ticks_on_empty_buffer_never_write() {
        let h = harness(Duration::from_millis(5), 100);
        let handle = thread::spawn(move || h.worker.run());

        thread::sleep(Duration::from_millis(60));
        h.control.send(Control::Shutdown).unwrap();

        assert_eq!(handle.join().unwrap(), WorkerExit::Shutdown);
        assert_eq!(h.sink.block_count(), 0);
    }

    #[test]
    fn test_high_water_mark_flushes_without_timer() {
        let h = harness(HOUR, 5);
        for i in 0..5 {
            h.queue.send(format!("line {}", i)).unwrap();
        }
        let sink = h.sink.clone();
        let handle = thread::spawn(move || h.worker.run());

        assert!(wait_for(|| sink.block_count() == 1));
        // no further flush is pending
        thread::sleep(Duration::from_millis(50));
        assert_eq!(sink.block_count(), 1);
        assert_eq!(
            sink.lines(),
            vec!["line 0", "line 1", "line 2", "line 3", "line 4"]
        );

        h.control.send(Control::Shutdown).unwrap();
        assert_eq!(handle.join().unwrap(), WorkerExit::Shutdown);
        assert_eq!(sink.block_count(), 1);
        assert_eq!(h.metrics.flushes(), 1);
        assert_eq!(h.metrics.flushed_lines(), 5);
    }

    #[test]
    fn test_timer_flushes_partial_buffer() {
        let h = harness(Duration::from_millis(20), 100);
        h.queue.send("first".to_string()).unwrap();
        h.queue.send("second".to_string()).unwrap();
        let sink = h.sink.clone();
        let handle = thread::spawn(move || h.worker.run());

        assert!(wait_for(|| sink.lines().len() == 2));
        assert_eq!(sink.lines(), vec!["first", "second"]);

        h.control.send(Control::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_fatal_drains_queued_lines() {
        let h = harness(HOUR, 100);
        for line in ["one", "two", "three", "fatal"] {
            h.queue.send(line.to_string()).unwrap();
        }
        h.control.send(Control::Fatal).unwrap();

        assert_eq!(h.worker.run(), WorkerExit::Fatal);
        assert_eq!(h.sink.lines(), vec!["one", "two", "three", "fatal"]);
    }

    #[test]
    fn test_drain_respects_high_water_mark() {
        let h = harness(HOUR, 4);
        for i in 0..10 {
            h.queue.send(format!("line {}", i)).unwrap();
        }
        h.control.send(Control::Shutdown).unwrap();

        assert_eq!(h.worker.run(), WorkerExit::Shutdown);
        let expected: Vec<String> = (0..10).map(|i| format!("line {}", i)).collect();
        assert_eq!(h.sink.lines(), expected);
        assert!(h.sink.blocks().iter().all(|block| block.lines().count() <= 4));
    }

    #[test]
    fn test_disconnect_persists_remaining_lines() {
        let h = harness(HOUR, 100);
        h.queue.send("last words".to_string()).unwrap();
        drop(h.queue);
        drop(h.control);

        assert_eq!(h.worker.run(), WorkerExit::Disconnected);
        assert_eq!(h.sink.lines(), vec!["last words"]);
    }

    #[test]
    fn test_write_failure_does_not_stop_worker() {
        struct FailingSink;

        impl Sink for FailingSink {
            fn append(&mut self, _block: &[u8]) -> Result<()> {
                Err(LoggerError::file_appender("test.log", "simulated failure"))
            }

            fn flush(&mut self) -> Result<()> {
                Ok(())
            }

            fn name(&self) -> &str {
                "failing"
            }
        }

        let (queue, queue_rx) = bounded(10);
        let (control, control_rx) = bounded(1);
        let metrics = Arc::new(LoggerMetrics::new());
        let worker = DrainWorker::new(
            Box::new(FailingSink),
            queue_rx,
            control_rx,
            HOUR,
            2,
            Arc::clone(&metrics),
        );

        for i in 0..5 {
            queue.send(format!("line {}", i)).unwrap();
        }
        control.send(Control::Shutdown).unwrap();

        assert_eq!(worker.run(), WorkerExit::Shutdown);
        assert_eq!(metrics.failed_flushes(), 3);
        assert_eq!(metrics.lost_lines(), 5);
        assert_eq!(metrics.flushes(), 0);
    }
}
