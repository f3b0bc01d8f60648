// Session metrics
//
// Lightweight counters describing how a session was played

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters for one quiz session.
///
/// Uses atomic operations so a front-end can hold a shared handle and read the
/// counters while the session task is updating them.
#[derive(Debug)]
pub struct SessionMetrics {
    /// Timer ticks applied
    pub ticks: AtomicU64,

    /// Selections recorded in the answer registry
    pub selections_accepted: AtomicU64,

    /// Accepted selections that replaced an earlier one for the same question
    pub selections_replaced: AtomicU64,

    /// Selections rejected (wrong phase, unknown question or answer)
    pub selections_rejected: AtomicU64,

    /// Questions whose data had to be repaired at load time
    pub data_quality_warnings: AtomicU64,

    /// Session events delivered to at least one subscriber
    pub events_published: AtomicU64,

    /// Session events sent while nobody was subscribed
    pub events_unobserved: AtomicU64,

    start_time: Instant,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            selections_accepted: AtomicU64::new(0),
            selections_replaced: AtomicU64::new(0),
            selections_rejected: AtomicU64::new(0),
            data_quality_warnings: AtomicU64::new(0),
            events_published: AtomicU64::new(0),
            events_unobserved: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an accepted selection; `replaced` marks an overwrite.
    pub fn record_selection_accepted(&self, replaced: bool) {
        self.selections_accepted.fetch_add(1, Ordering::Relaxed);
        if replaced {
            self.selections_replaced.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_selection_rejected(&self) {
        self.selections_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_data_quality_warning(&self) {
        self.data_quality_warnings.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_event_published(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_event_unobserved(&self) {
        self.events_unobserved.fetch_add(1, Ordering::Relaxed);
    }

    /// Wall-clock time since the metrics were created
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Share of selection attempts that were recorded, from 0.0 to 1.0
    pub fn acceptance_rate(&self) -> f64 {
        let accepted = self.selections_accepted.load(Ordering::Relaxed);
        let rejected = self.selections_rejected.load(Ordering::Relaxed);
        let attempts = accepted + rejected;
        if attempts > 0 {
            accepted as f64 / attempts as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Session Metrics Summary ===");
        tracing::info!(
            "Elapsed: {:.2}s, ticks: {}",
            self.elapsed().as_secs_f64(),
            self.ticks.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Selections: {} accepted ({} replaced), {} rejected, acceptance {:.0}%",
            self.selections_accepted.load(Ordering::Relaxed),
            self.selections_replaced.load(Ordering::Relaxed),
            self.selections_rejected.load(Ordering::Relaxed),
            self.acceptance_rate() * 100.0
        );
        tracing::info!(
            "Data quality warnings: {}",
            self.data_quality_warnings.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Events: {} published, {} unobserved",
            self.events_published.load(Ordering::Relaxed),
            self.events_unobserved.load(Ordering::Relaxed)
        );
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = SessionMetrics::new();
        assert_eq!(metrics.ticks.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.selections_accepted.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_selections() {
        let metrics = SessionMetrics::new();

        metrics.record_selection_accepted(false);
        metrics.record_selection_accepted(true);
        metrics.record_selection_accepted(false);
        metrics.record_selection_rejected();

        assert_eq!(metrics.selections_accepted.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.selections_replaced.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.selections_rejected.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.acceptance_rate(), 0.75);
    }

    #[test]
    fn test_acceptance_rate_without_attempts() {
        let metrics = SessionMetrics::new();
        assert_eq!(metrics.acceptance_rate(), 0.0);
    }

    #[test]
    fn test_elapsed() {
        let metrics = SessionMetrics::new();
        thread::sleep(Duration::from_millis(10));
        assert!(metrics.elapsed().as_millis() >= 10);
    }

    #[test]
    fn test_event_counters() {
        let metrics = SessionMetrics::new();

        metrics.record_tick();
        metrics.record_data_quality_warning();
        metrics.record_event_published();
        metrics.record_event_unobserved();

        assert_eq!(metrics.ticks.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.data_quality_warnings.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.events_published.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.events_unobserved.load(Ordering::Relaxed), 1);
    }
}
