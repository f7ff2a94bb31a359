#![allow(dead_code)]

use beacon_client::buffer::Batch;
use beacon_client::sender::{DeliveryOutcome, Transport};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Records every batch it is handed and answers from a scripted queue of
/// outcomes, falling back to `Delivered`.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    outcomes: Arc<Mutex<VecDeque<DeliveryOutcome>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl RecordingTransport {
    pub fn with_outcomes(outcomes: impl IntoIterator<Item = DeliveryOutcome>) -> Self {
        let transport = Self::default();
        transport.outcomes.lock().extend(outcomes);
        transport
    }

    /// Messages of the events in each call, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, batch: &Batch) -> DeliveryOutcome {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let messages = batch
            .events()
            .map(|event| event.message().into_owned())
            .collect();
        self.calls.lock().push(messages);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .pop_front()
            .unwrap_or(DeliveryOutcome::Delivered)
    }
}
