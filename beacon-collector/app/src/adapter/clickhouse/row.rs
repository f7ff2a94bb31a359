use crate::domain::{StoredEvent, TelemetryEvent, Variant};
use crate::port::StoreError;
use chrono::{DateTime, Utc};
use clickhouse::serde::chrono::datetime64::millis;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(clickhouse::Row, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EventRow {
    pub id: String, // String
    #[serde(with = "millis")]
    pub created_at: DateTime<Utc>, // DateTime64(3,'UTC')
    pub kind: String,                  // LowCardinality(String)
    pub timestamp: i64,                // Int64, client epoch millis
    pub screen_name: Option<String>,   // Nullable(String)
    pub button_name: Option<String>,   // Nullable(String)
    pub variant: Option<String>,       // Nullable(String)
    pub render_time_ms: Option<f64>,   // Nullable(Float64)
    pub metadata: String,              // String, JSON object text
    pub message: String,               // String
}

/// Result row of a `GROUP BY` count.
#[derive(clickhouse::Row, Serialize, Deserialize, Clone, Debug)]
pub struct CountRow {
    pub key: String,
    pub count: u64,
}

impl From<StoredEvent> for EventRow {
    fn from(stored: StoredEvent) -> Self {
        let message = stored.message().to_string();
        let event = stored.event;
        let metadata = if event.metadata.is_empty() {
            String::new()
        } else {
            Value::Object(event.metadata).to_string()
        };

        Self {
            id: stored.id,
            created_at: stored.created_at,
            kind: event.kind.to_string(),
            timestamp: event.timestamp,
            screen_name: event.screen_name,
            button_name: event.button_name,
            variant: event.variant.map(|v| v.to_string()),
            render_time_ms: event.render_time_ms,
            metadata,
            message,
        }
    }
}

impl TryFrom<EventRow> for StoredEvent {
    type Error = StoreError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let corrupt = |what: String| StoreError::Corrupt(format!("row {}: {what}", row.id));

        let kind = row
            .kind
            .parse()
            .map_err(|_| corrupt(format!("unknown kind '{}'", row.kind)))?;
        let variant = row
            .variant
            .as_deref()
            .map(str::parse::<Variant>)
            .transpose()
            .map_err(|e: String| corrupt(e))?;
        let metadata = if row.metadata.is_empty() {
            Map::new()
        } else {
            serde_json::from_str(&row.metadata)
                .map_err(|e| corrupt(format!("metadata is not a JSON object: {e}")))?
        };

        let mut event = TelemetryEvent::new(kind).with_timestamp(row.timestamp);
        event.screen_name = row.screen_name;
        event.button_name = row.button_name;
        event.variant = variant;
        event.render_time_ms = row.render_time_ms;
        event.metadata = metadata;
        event.message = Some(row.message);

        Ok(StoredEvent {
            id: row.id,
            created_at: row.created_at,
            event,
        })
    }
}
