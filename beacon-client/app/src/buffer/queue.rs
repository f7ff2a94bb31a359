use super::metrics::{BufferMetrics, BufferMetricsSnapshot};
use crate::domain::TelemetryEvent;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Instant;

/// An event waiting in the client buffer.
#[derive(Debug, Clone)]
pub struct BufferedEvent {
    pub event: TelemetryEvent,
    pub enqueued_at: Instant,
    /// Delivery attempts that ended in a retryable failure.
    pub attempts: u32,
}

impl BufferedEvent {
    pub fn new(event: TelemetryEvent) -> Self {
        Self {
            event,
            enqueued_at: Instant::now(),
            attempts: 0,
        }
    }
}

/// Ordered, unbounded in-memory queue of events awaiting delivery.
///
/// Events leave in the order they were enqueued. Requeued events go back to
/// the front so they are retried ahead of anything that arrived later.
#[derive(Debug, Default)]
pub struct EventBuffer {
    queue: Mutex<VecDeque<BufferedEvent>>,
    metrics: BufferMetrics,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event, deriving its message if the producer left it empty.
    /// Returns `true` when the buffer was empty beforehand, which callers use
    /// to trigger an early flush.
    pub fn enqueue(&self, mut event: TelemetryEvent) -> bool {
        event.ensure_message();
        let mut queue = self.queue.lock();
        let was_empty = queue.is_empty();
        queue.push_back(BufferedEvent::new(event));
        self.metrics.record_enqueued(1, queue.len());
        was_empty
    }

    /// Removes and returns up to `max` events from the front.
    pub fn drain_up_to(&self, max: usize) -> Vec<BufferedEvent> {
        let mut queue = self.queue.lock();
        let take = max.min(queue.len());
        let drained: Vec<_> = queue.drain(..take).collect();
        self.metrics.record_drained(drained.len());
        drained
    }

    /// Removes and returns everything currently buffered.
    pub fn drain_all(&self) -> Vec<BufferedEvent> {
        self.drain_up_to(usize::MAX)
    }

    /// Puts failed events back at the front, preserving their relative order.
    pub fn requeue(&self, events: Vec<BufferedEvent>) {
        if events.is_empty() {
            return;
        }
        let count = events.len();
        let mut queue = self.queue.lock();
        for mut buffered in events.into_iter().rev() {
            buffered.attempts = buffered.attempts.saturating_add(1);
            queue.push_front(buffered);
        }
        self.metrics.record_requeued(count, queue.len());
    }

    pub fn pending_count(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Copies of the buffered events in delivery order.
    pub fn snapshot(&self) -> Vec<TelemetryEvent> {
        self.queue
            .lock()
            .iter()
            .map(|buffered| buffered.event.clone())
            .collect()
    }

    /// Drops every buffered event and returns how many were discarded.
    pub fn clear(&self) -> usize {
        let mut queue = self.queue.lock();
        let discarded = queue.len();
        queue.clear();
        self.metrics.record_cleared(discarded);
        discarded
    }

    pub fn metrics(&self) -> BufferMetricsSnapshot {
        self.metrics.snapshot(self.pending_count())
    }
}
