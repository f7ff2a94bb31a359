#![allow(dead_code)]

use axum_test::TestServer;
use beacon_collector::adapter::MemoryEventStore;
use beacon_collector::domain::{DateRange, EventFilter, EventStats, Page, StoredEvent};
use beacon_collector::port::{EventStore, StoreError, StoreFuture};
use beacon_collector::{AppState, router};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Memory store that can fail chosen inserts (1-based call numbers) or
/// pretend the backend is unreachable.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryEventStore,
    fail_calls: Vec<usize>,
    fail_all: bool,
    down: bool,
    calls: AtomicUsize,
}

impl FlakyStore {
    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            fail_calls: calls.to_vec(),
            ..Self::default()
        }
    }

    pub fn failing_every_insert() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn down() -> Self {
        Self {
            down: true,
            ..Self::default()
        }
    }
}

impl EventStore for FlakyStore {
    fn insert_one(&self, event: StoredEvent) -> StoreFuture<'_, ()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_all || self.fail_calls.contains(&call) {
            return Box::pin(async move {
                Err(StoreError::Rejected(format!("constraint violation on insert {call}")))
            });
        }
        self.inner.insert_one(event)
    }

    fn find(&self, filter: EventFilter, page: Page) -> StoreFuture<'_, Vec<StoredEvent>> {
        self.inner.find(filter, page)
    }

    fn count(&self, filter: EventFilter) -> StoreFuture<'_, u64> {
        self.inner.count(filter)
    }

    fn find_by_id(&self, id: String) -> StoreFuture<'_, Option<StoredEvent>> {
        self.inner.find_by_id(id)
    }

    fn stats(&self, range: DateRange) -> StoreFuture<'_, EventStats> {
        self.inner.stats(range)
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        if self.down {
            return Box::pin(async { Err(StoreError::Unavailable("connection refused".into())) });
        }
        self.inner.ping()
    }
}

pub fn server_with(store: Arc<dyn EventStore>) -> TestServer {
    TestServer::new(router(AppState::new(store))).unwrap()
}

pub fn memory_server() -> (TestServer, Arc<MemoryEventStore>) {
    let store = Arc::new(MemoryEventStore::new());
    (server_with(store.clone()), store)
}
