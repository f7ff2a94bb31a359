use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Running counters for an [`EventBuffer`](super::EventBuffer).
#[derive(Debug, Default)]
pub struct BufferMetrics {
    enqueued: AtomicU64,
    drained: AtomicU64,
    requeued: AtomicU64,
    cleared: AtomicU64,
    peak_pending: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BufferMetricsSnapshot {
    pub pending: usize,
    pub peak_pending: usize,
    pub enqueued: u64,
    pub drained: u64,
    pub requeued: u64,
    pub cleared: u64,
}

impl BufferMetrics {
    pub(crate) fn record_enqueued(&self, count: usize, pending: usize) {
        self.enqueued.fetch_add(count as u64, Ordering::Relaxed);
        self.peak_pending.fetch_max(pending, Ordering::Relaxed);
    }

    pub(crate) fn record_drained(&self, count: usize) {
        self.drained.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_requeued(&self, count: usize, pending: usize) {
        self.requeued.fetch_add(count as u64, Ordering::Relaxed);
        self.peak_pending.fetch_max(pending, Ordering::Relaxed);
    }

    pub(crate) fn record_cleared(&self, count: usize) {
        self.cleared.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self, pending: usize) -> BufferMetricsSnapshot {
        BufferMetricsSnapshot {
            pending,
            peak_pending: self.peak_pending.load(Ordering::Relaxed),
            enqueued: self.enqueued.load(Ordering::Relaxed),
            drained: self.drained.load(Ordering::Relaxed),
            requeued: self.requeued.load(Ordering::Relaxed),
            cleared: self.cleared.load(Ordering::Relaxed),
        }
    }
}
