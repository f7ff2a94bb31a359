use beacon_event::TelemetryEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted event: the submitted fields plus a server-assigned id and
/// ingestion time. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: TelemetryEvent,
}

impl StoredEvent {
    /// Wraps a validated event, deriving its message if it has none.
    pub fn new(event: TelemetryEvent) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            event: event.with_derived_message(),
        }
    }

    pub fn message(&self) -> &str {
        self.event.message.as_deref().unwrap_or_default()
    }
}
