//! Logger metrics for observability
//!
//! Counters for the facade (dispatched, filtered, local write failures) and
//! for each remote sink's delivery queue.

use std::sync::atomic::{AtomicU64, Ordering};

/// Facade-level counters
///
/// # Example
///
/// ```
/// use husplus_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_logged();
/// metrics.record_local_failure();
///
/// assert_eq!(metrics.total_logged(), 1);
/// assert_eq!(metrics.local_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records that passed the level filter and were dispatched
    total_logged: AtomicU64,

    /// Records rejected by the level filter
    filtered: AtomicU64,

    /// Local stream writes that failed
    local_failures: AtomicU64,

    /// Sink deliveries that returned an error or panicked
    sink_errors: AtomicU64,

    /// Records that could not be serialized
    format_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            local_failures: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
            format_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn local_failures(&self) -> u64 {
        self.local_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_errors(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn format_failures(&self) -> u64 {
        self.format_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_local_failure(&self) -> u64 {
        self.local_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_error(&self) -> u64 {
        self.sink_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_format_failure(&self) -> u64 {
        self.format_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.total_logged.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.local_failures.store(0, Ordering::Relaxed);
        self.sink_errors.store(0, Ordering::Relaxed);
        self.format_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            total_logged: AtomicU64::new(self.total_logged()),
            filtered: AtomicU64::new(self.filtered()),
            local_failures: AtomicU64::new(self.local_failures()),
            sink_errors: AtomicU64::new(self.sink_errors()),
            format_failures: AtomicU64::new(self.format_failures()),
        }
    }
}

/// Counters for one remote sink's delivery queue
#[derive(Debug, Default)]
pub struct DeliveryMetrics {
    queued: AtomicU64,
    dropped: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
}

impl DeliveryMetrics {
    pub const fn new() -> Self {
        Self {
            queued: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Records accepted into the queue
    #[inline]
    pub fn queued(&self) -> u64 {
        self.queued.load(Ordering::Relaxed)
    }

    /// Records dropped because the queue was full
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Records the backend acknowledged
    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Records lost to transport or backend errors
    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Records queued but not yet delivered or failed
    pub fn pending(&self) -> u64 {
        self.queued()
            .saturating_sub(self.delivered())
            .saturating_sub(self.failed())
    }

    #[inline]
    pub fn record_queued(&self) -> u64 {
        self.queued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self, count: u64) -> u64 {
        self.delivered.fetch_add(count, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self, count: u64) -> u64 {
        self.failed.fetch_add(count, Ordering::Relaxed)
    }

    /// Drop rate as a percentage (0.0 - 100.0) of everything offered to the queue
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped() as f64;
        let total = self.queued() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.total_logged(), 0);
        assert_eq!(metrics.filtered(), 0);
        assert_eq!(metrics.local_failures(), 0);
        assert_eq!(metrics.sink_errors(), 0);
        assert_eq!(metrics.format_failures(), 0);
    }

    #[test]
    fn test_metrics_record_returns_previous() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_logged(), 0);
        assert_eq!(metrics.record_logged(), 1);
        assert_eq!(metrics.total_logged(), 2);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_logged();
        metrics.record_filtered();
        metrics.record_local_failure();

        metrics.reset();

        assert_eq!(metrics.total_logged(), 0);
        assert_eq!(metrics.filtered(), 0);
        assert_eq!(metrics.local_failures(), 0);
    }

    #[test]
    fn test_metrics_clone_is_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_sink_error();

        let snapshot = metrics.clone();
        metrics.record_sink_error();

        assert_eq!(metrics.sink_errors(), 2);
        assert_eq!(snapshot.sink_errors(), 1);
    }

    #[test]
    fn test_delivery_pending_and_drop_rate() {
        let metrics = DeliveryMetrics::new();
        assert_eq!(metrics.drop_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_queued();
        }
        for _ in 0..10 {
            metrics.record_dropped();
        }
        metrics.record_delivered(50);
        metrics.record_failed(5);

        assert_eq!(metrics.pending(), 35);
        let rate = metrics.drop_rate();
        assert!((9.9..=10.1).contains(&rate), "Drop rate was {}", rate);
    }
}
