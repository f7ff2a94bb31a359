use crate::adapter::clickhouse::ClickHouseEventStore;
use crate::adapter::memory::MemoryEventStore;
use crate::config::{Settings, StorageBackend};
use crate::port::EventStore;
use clickhouse::Client;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Build the configured storage backend.
    ///
    /// For ClickHouse the table is created when missing. An unreachable
    /// server is not fatal: the collector starts and `/api/health` reports
    /// the storage as disconnected.
    pub async fn from_settings(settings: &Settings) -> Self {
        let store: Arc<dyn EventStore> = match &settings.storage {
            StorageBackend::Memory => {
                info!("Using in-memory event store");
                Arc::new(MemoryEventStore::new())
            }
            StorageBackend::ClickHouse(ch) => {
                let client = Client::default()
                    .with_url(ch.url())
                    .with_user(&ch.user)
                    .with_password(&ch.password)
                    .with_database(&ch.database);
                let store = ClickHouseEventStore::new(client);
                match store.ensure_schema().await {
                    Ok(()) => info!(url = %ch.url(), "Connected to ClickHouse"),
                    Err(e) => warn!(error = %e, "ClickHouse schema setup failed; continuing"),
                }
                Arc::new(store)
            }
        };
        Self::new(store)
    }
}
