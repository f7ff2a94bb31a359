use crate::buffer::{Batch, BufferedEvent, EventBuffer};
use crate::domain::TelemetryEvent;
use crate::sender::{BatchTransmitter, DeliveryOutcome, Transport};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub batch_size: usize,
    pub interval: Duration,
    /// When false, events stay in the buffer and nothing is sent.
    pub enabled: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            interval: Duration::from_millis(2000),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DispatchState {
    Idle,
    Sending,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlushSummary {
    pub batches: usize,
    pub delivered: usize,
    pub requeued: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Sync is switched off.
    Disabled,
    /// Another cycle is in flight; this request was coalesced into it.
    AlreadySending,
    /// Nothing was pending.
    Empty,
    Completed(FlushSummary),
}

#[derive(Debug, Default)]
pub struct DispatchStats {
    cycles: AtomicU64,
    coalesced: AtomicU64,
    delivered: AtomicU64,
    requeued: AtomicU64,
    dropped: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchStatsSnapshot {
    pub cycles: u64,
    pub coalesced: u64,
    pub delivered: u64,
    pub requeued: u64,
    pub dropped: u64,
}

impl DispatchStats {
    fn record(&self, summary: &FlushSummary) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        self.delivered
            .fetch_add(summary.delivered as u64, Ordering::Relaxed);
        self.requeued
            .fetch_add(summary.requeued as u64, Ordering::Relaxed);
        self.dropped.fetch_add(summary.dropped as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DispatchStatsSnapshot {
        DispatchStatsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            requeued: self.requeued.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Clears the sending flag when a cycle ends, including on panic.
struct SendingGuard<'a>(&'a AtomicBool);

impl<'a> SendingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Single-flight batch delivery over a shared [`EventBuffer`].
pub struct BatchDispatcher<T = BatchTransmitter> {
    buffer: Arc<EventBuffer>,
    transport: T,
    config: DispatchConfig,
    sending: AtomicBool,
    pub(super) trigger: Notify,
    stats: DispatchStats,
}

impl<T: Transport> BatchDispatcher<T> {
    pub fn new(buffer: Arc<EventBuffer>, transport: T, config: DispatchConfig) -> Self {
        Self {
            buffer,
            transport,
            config,
            sending: AtomicBool::new(false),
            trigger: Notify::new(),
            stats: DispatchStats::default(),
        }
    }

    pub fn buffer(&self) -> &Arc<EventBuffer> {
        &self.buffer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn stats(&self) -> DispatchStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn state(&self) -> DispatchState {
        if self.sending.load(Ordering::Acquire) {
            DispatchState::Sending
        } else {
            DispatchState::Idle
        }
    }

    /// Buffers an event and wakes the scheduled task if this made the buffer
    /// non-empty.
    pub fn enqueue(&self, event: TelemetryEvent) {
        if self.buffer.enqueue(event) {
            self.request_flush();
        }
    }

    /// Asks the scheduled task to run a cycle now. Ignored while sending or
    /// when sync is disabled.
    pub fn request_flush(&self) {
        if self.config.enabled && self.state() == DispatchState::Idle {
            self.trigger.notify_one();
        }
    }

    /// Runs one delivery cycle.
    ///
    /// Everything pending at the start is split into batches of
    /// `batch_size` and sent one after another. Retryable batches go back to
    /// the front of the buffer in their original order once the cycle ends;
    /// rejected batches are dropped.
    pub async fn flush(&self) -> FlushOutcome {
        if !self.config.enabled {
            return FlushOutcome::Disabled;
        }
        let Some(_guard) = SendingGuard::acquire(&self.sending) else {
            self.stats.coalesced.fetch_add(1, Ordering::Relaxed);
            debug!("Flush requested while sending, coalescing");
            return FlushOutcome::AlreadySending;
        };

        let pending = self.buffer.drain_all();
        if pending.is_empty() {
            return FlushOutcome::Empty;
        }

        let batches = Batch::partition(pending, self.config.batch_size);
        let mut summary = FlushSummary {
            batches: batches.len(),
            ..FlushSummary::default()
        };
        let mut failed: Vec<BufferedEvent> = Vec::new();

        for batch in batches {
            let size = batch.size();
            match self.transport.send(&batch).await {
                DeliveryOutcome::Delivered => {
                    debug!(batch_id = batch.id(), size, "Batch delivered");
                    summary.delivered += size;
                }
                DeliveryOutcome::Retryable(reason) => {
                    debug!(batch_id = batch.id(), size, %reason, "Batch will be retried");
                    summary.requeued += size;
                    failed.extend(batch.into_events());
                }
                DeliveryOutcome::Rejected(reason) => {
                    warn!(batch_id = batch.id(), size, %reason, "Batch rejected by collector, dropping");
                    summary.dropped += size;
                }
            }
        }

        self.buffer.requeue(failed);
        self.stats.record(&summary);

        if summary.requeued > 0 {
            info!(
                delivered = summary.delivered,
                requeued = summary.requeued,
                dropped = summary.dropped,
                pending = self.buffer.pending_count(),
                "Flush finished with undelivered events"
            );
        } else {
            debug!(
                delivered = summary.delivered,
                dropped = summary.dropped,
                "Flush finished"
            );
        }
        FlushOutcome::Completed(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);
        let guard = SendingGuard::acquire(&flag);
        assert!(guard.is_some());
        assert!(SendingGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(SendingGuard::acquire(&flag).is_some());
    }

    #[test]
    fn default_config_matches_client_defaults() {
        let config = DispatchConfig::default();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.interval, Duration::from_millis(2000));
        assert!(config.enabled);
    }
}
