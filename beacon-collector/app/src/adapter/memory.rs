use crate::domain::{DateRange, EventFilter, EventStats, Page, StoredEvent};
use crate::port::{EventStore, StoreError, StoreFuture};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Inner {
    events: Vec<StoredEvent>,
    /// id -> position in `events`
    by_id: HashMap<String, usize>,
}

/// Process-local event store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    inner: RwLock<Inner>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().events.is_empty()
    }

    /// Matching events newest first; ties keep reverse insertion order.
    fn matching(&self, filter: &EventFilter) -> Vec<StoredEvent> {
        let mut matched: Vec<_> = self
            .inner
            .read()
            .events
            .iter()
            .rev()
            .filter(|stored| filter.matches(stored))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }
}

impl EventStore for MemoryEventStore {
    fn insert_one(&self, event: StoredEvent) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut inner = self.inner.write();
            if inner.by_id.contains_key(&event.id) {
                return Err(StoreError::Rejected(format!("duplicate id {}", event.id)));
            }
            let position = inner.events.len();
            inner.by_id.insert(event.id.clone(), position);
            inner.events.push(event);
            Ok(())
        })
    }

    fn find(&self, filter: EventFilter, page: Page) -> StoreFuture<'_, Vec<StoredEvent>> {
        Box::pin(async move {
            let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
            Ok(self
                .matching(&filter)
                .into_iter()
                .skip(offset)
                .take(page.limit as usize)
                .collect())
        })
    }

    fn count(&self, filter: EventFilter) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            let inner = self.inner.read();
            Ok(inner.events.iter().filter(|stored| filter.matches(stored)).count() as u64)
        })
    }

    fn find_by_id(&self, id: String) -> StoreFuture<'_, Option<StoredEvent>> {
        Box::pin(async move {
            let inner = self.inner.read();
            Ok(inner
                .by_id
                .get(&id)
                .and_then(|&position| inner.events.get(position))
                .cloned())
        })
    }

    fn stats(&self, range: DateRange) -> StoreFuture<'_, EventStats> {
        Box::pin(async move {
            let inner = self.inner.read();
            Ok(EventStats::compute(
                inner.events.iter().filter(|stored| range.contains(&stored.created_at)),
            ))
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }
}
