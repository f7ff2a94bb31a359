use crate::domain::{DateRange, EventFilter, EventStats, Page, StoredEvent};
use futures::future::join_all;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("insert rejected: {0}")]
    Rejected(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
}

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertFailure {
    /// Position of the entry in the list handed to `insert_many`.
    pub index: usize,
    pub error: StoreError,
}

/// Outcome of an unordered bulk insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertReport {
    pub inserted: usize,
    pub failures: Vec<InsertFailure>,
}

impl InsertReport {
    pub fn from_results(results: impl IntoIterator<Item = Result<(), StoreError>>) -> Self {
        let mut report = Self::default();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(()) => report.inserted += 1,
                Err(error) => report.failures.push(InsertFailure { index, error }),
            }
        }
        report
    }

    pub fn attempted(&self) -> usize {
        self.inserted + self.failures.len()
    }
}

/// Persistence port for telemetry events.
pub trait EventStore: Send + Sync {
    fn insert_one(&self, event: StoredEvent) -> StoreFuture<'_, ()>;

    /// Inserts every entry independently: one failure never prevents the
    /// others from being stored.
    fn insert_many(
        &self,
        events: Vec<StoredEvent>,
    ) -> Pin<Box<dyn Future<Output = InsertReport> + Send + '_>> {
        Box::pin(async move {
            let results = join_all(events.into_iter().map(|event| self.insert_one(event))).await;
            InsertReport::from_results(results)
        })
    }

    /// Matching events, newest ingestion first.
    fn find(&self, filter: EventFilter, page: Page) -> StoreFuture<'_, Vec<StoredEvent>>;

    fn count(&self, filter: EventFilter) -> StoreFuture<'_, u64>;

    fn find_by_id(&self, id: String) -> StoreFuture<'_, Option<StoredEvent>>;

    fn stats(&self, range: DateRange) -> StoreFuture<'_, EventStats>;

    /// Succeeds when the backend is reachable.
    fn ping(&self) -> StoreFuture<'_, ()>;
}
