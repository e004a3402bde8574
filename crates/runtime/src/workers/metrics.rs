//! Search metrics and statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Search counters shared between the worker and its handles.
///
/// Uses atomics for lock-free access across threads.
#[derive(Debug, Default)]
pub struct SearchMetrics {
    completed: AtomicU64,
    failed: AtomicU64,
    superseded: AtomicU64,
    /// Nodes visited by completed searches
    nodes: AtomicU64,
    total_search_nanos: AtomicU64,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_completed(&self, nodes: u64, elapsed: Duration) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.nodes.fetch_add(nodes, Ordering::Relaxed);
        self.total_search_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_superseded(&self) {
        self.superseded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn superseded(&self) -> u64 {
        self.superseded.load(Ordering::Relaxed)
    }

    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    /// Average wall time of completed searches.
    pub fn avg_search_time(&self) -> Duration {
        let completed = self.completed();
        if completed == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.total_search_nanos.load(Ordering::Relaxed) / completed)
        }
    }

    /// Creates a snapshot of all metrics for display/logging.
    ///
    /// Individual fields are read atomically; the snapshot as a whole may mix
    /// values from concurrent updates.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            completed: self.completed(),
            failed: self.failed(),
            superseded: self.superseded(),
            nodes: self.nodes(),
            avg_search_time: self.avg_search_time(),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub completed: u64,
    pub failed: u64,
    pub superseded: u64,
    pub nodes: u64,
    pub avg_search_time: Duration,
}
