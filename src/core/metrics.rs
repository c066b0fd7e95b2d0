//! Logger metrics for observability
//!
//! Counters are updated from producer threads (console and enqueue) and from
//! the drain worker (flushes). All updates are relaxed atomics.

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use drain_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_enqueued();
/// metrics.record_flush(1);
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.flushed_lines(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Events that passed the level gate and reached the console
    logged: AtomicU64,

    /// Lines handed to the drain worker's queue
    enqueued: AtomicU64,

    /// Successful sink writes
    flushes: AtomicU64,

    /// Lines persisted by successful sink writes
    flushed_lines: AtomicU64,

    /// Sink writes that returned an error
    failed_flushes: AtomicU64,

    /// Lines discarded because their flush failed
    lost_lines: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            logged: AtomicU64::new(0),
            enqueued: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            flushed_lines: AtomicU64::new(0),
            failed_flushes: AtomicU64::new(0),
            lost_lines: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn logged(&self) -> u64 {
        self.logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushed_lines(&self) -> u64 {
        self.flushed_lines.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_flushes(&self) -> u64 {
        self.failed_flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lost_lines(&self) -> u64 {
        self.lost_lines.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a successful sink write of `lines` lines
    #[inline]
    pub fn record_flush(&self, lines: usize) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.flushed_lines.fetch_add(lines as u64, Ordering::Relaxed);
    }

    /// Record a failed sink write, returning the previous failure count
    #[inline]
    pub fn record_failed_flush(&self, lines: usize) -> u64 {
        self.lost_lines.fetch_add(lines as u64, Ordering::Relaxed);
        self.failed_flushes.fetch_add(1, Ordering::Relaxed)
    }

    /// Lines enqueued but not yet persisted or lost
    pub fn in_flight(&self) -> u64 {
        self.enqueued()
            .saturating_sub(self.flushed_lines())
            .saturating_sub(self.lost_lines())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.logged(), 0);
        assert_eq!(metrics.enqueued(), 0);
        assert_eq!(metrics.flushes(), 0);
        assert_eq!(metrics.failed_flushes(), 0);
        assert_eq!(metrics.in_flight(), 0);
    }

    #[test]
    fn test_in_flight_accounts_for_losses() {
        let metrics = LoggerMetrics::new();
        for _ in 0..10 {
            metrics.record_enqueued();
        }
        metrics.record_flush(6);
        assert_eq!(metrics.in_flight(), 4);

        assert_eq!(metrics.record_failed_flush(3), 0);
        assert_eq!(metrics.in_flight(), 1);
        assert_eq!(metrics.lost_lines(), 3);
        assert_eq!(metrics.flushes(), 1);
    }
}
