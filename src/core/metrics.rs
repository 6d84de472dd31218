//! Dispatch metrics for observability
//!
//! Counts records created, calls filtered by level, and deliveries to
//! listeners across every logger of one registry.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for dispatcher observability
///
/// # Example
///
/// ```
/// use logger_hierarchy::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_filtered();
/// metrics.record_created();
///
/// assert_eq!(metrics.records_filtered(), 1);
/// assert_eq!(metrics.records_created(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records built by calls that passed the level check
    records_created: AtomicU64,

    /// Calls rejected by the level check
    records_filtered: AtomicU64,

    /// Individual listener deliveries
    deliveries: AtomicU64,

    /// Stream listeners removed after their subscription was dropped
    listeners_pruned: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_created: AtomicU64::new(0),
            records_filtered: AtomicU64::new(0),
            deliveries: AtomicU64::new(0),
            listeners_pruned: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_created(&self) -> u64 {
        self.records_created.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_filtered(&self) -> u64 {
        self.records_filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deliveries(&self) -> u64 {
        self.deliveries.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn listeners_pruned(&self) -> u64 {
        self.listeners_pruned.load(Ordering::Relaxed)
    }

    /// Record a created record; returns the previous count
    #[inline]
    pub fn record_created(&self) -> u64 {
        self.records_created.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a filtered call; returns the previous count
    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.records_filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self, count: u64) -> u64 {
        self.deliveries.fetch_add(count, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_pruned(&self, count: u64) -> u64 {
        self.listeners_pruned.fetch_add(count, Ordering::Relaxed)
    }

    /// Share of log calls rejected by the level check, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no calls have been made.
    pub fn filter_rate(&self) -> f64 {
        let filtered = self.records_filtered() as f64;
        let total = self.records_created() as f64 + filtered;
        if total == 0.0 {
            0.0
        } else {
            (filtered / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.records_created.store(0, Ordering::Relaxed);
        self.records_filtered.store(0, Ordering::Relaxed);
        self.deliveries.store(0, Ordering::Relaxed);
        self.listeners_pruned.store(0, Ordering::Relaxed);
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
            records_created: AtomicU64::new(self.records_created()),
            records_filtered: AtomicU64::new(self.records_filtered()),
            deliveries: AtomicU64::new(self.deliveries()),
            listeners_pruned: AtomicU64::new(self.listeners_pruned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.records_created(), 0);
        assert_eq!(metrics.records_filtered(), 0);
        assert_eq!(metrics.deliveries(), 0);
        assert_eq!(metrics.listeners_pruned(), 0);
    }

    #[test]
    fn test_record_returns_previous() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_created(), 0);
        assert_eq!(metrics.record_created(), 1);
        assert_eq!(metrics.record_delivered(3), 0);
        assert_eq!(metrics.deliveries(), 3);
    }

    #[test]
    fn test_filter_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.filter_rate(), 0.0);

        for _ in 0..75 {
            metrics.record_created();
        }
        for _ in 0..25 {
            metrics.record_filtered();
        }

        let rate = metrics.filter_rate();
        assert!((24.9..=25.1).contains(&rate), "Filter rate was {}", rate);
    }

    #[test]
    fn test_reset_and_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_created();
        metrics.record_pruned(2);

        let snapshot = metrics.clone();
        metrics.reset();

        assert_eq!(metrics.records_created(), 0);
        assert_eq!(metrics.listeners_pruned(), 0);
        assert_eq!(snapshot.records_created(), 1);
        assert_eq!(snapshot.listeners_pruned(), 2);
    }
}
