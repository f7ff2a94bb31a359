use super::queue::BufferedEvent;
use crate::domain::TelemetryEvent;
use serde::Serialize;
use uuid::Uuid;

/// A chunk of buffered events sent together in one request.
#[derive(Debug, Clone)]
pub struct Batch {
    id: String,
    events: Vec<BufferedEvent>,
}

/// Request body for the batch endpoint.
#[derive(Debug, Serialize)]
pub struct BatchPayload<'a> {
    pub events: Vec<&'a TelemetryEvent>,
}

impl Batch {
    pub fn new(events: Vec<BufferedEvent>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            events,
        }
    }

    /// Splits `events` into consecutive batches of at most `size` events.
    ///
    /// A `size` of zero is treated as one so every event still gets sent.
    pub fn partition(events: Vec<BufferedEvent>, size: usize) -> Vec<Batch> {
        let size = size.max(1);
        let mut batches = Vec::with_capacity(events.len().div_ceil(size));
        let mut iter = events.into_iter().peekable();
        while iter.peek().is_some() {
            batches.push(Batch::new(iter.by_ref().take(size).collect()));
        }
        batches
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn size(&self) -> usize {
        self.events.len()
    }

    pub fn events(&self) -> impl Iterator<Item = &TelemetryEvent> {
        self.events.iter().map(|buffered| &buffered.event)
    }

    pub fn payload(&self) -> BatchPayload<'_> {
        BatchPayload {
            events: self.events().collect(),
        }
    }

    pub fn into_events(self) -> Vec<BufferedEvent> {
        self.events
    }
}
