use crate::kind::{EventKind, Variant};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Milliseconds since the Unix epoch, UTC.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A single usage telemetry event as produced by the application.
///
/// `message` may be left empty by producers; [`TelemetryEvent::derive_message`]
/// computes the canonical summary from the other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
    #[serde(alias = "type")]
    pub kind: EventKind,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(default, alias = "renderTime", skip_serializing_if = "Option::is_none")]
    pub render_time_ms: Option<f64>,
    /// Opaque producer data; never interpreted by the pipeline.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TelemetryEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            timestamp: now_millis(),
            screen_name: None,
            button_name: None,
            variant: None,
            render_time_ms: None,
            metadata: Map::new(),
            message: None,
        }
    }

    pub fn screen_view(screen_name: impl Into<String>, variant: Option<Variant>) -> Self {
        Self {
            screen_name: Some(screen_name.into()),
            variant,
            ..Self::new(EventKind::ScreenView)
        }
    }

    pub fn button_click(button_name: impl Into<String>, screen_name: Option<String>) -> Self {
        Self {
            button_name: Some(button_name.into()),
            screen_name,
            ..Self::new(EventKind::ButtonClick)
        }
    }

    pub fn render_time(screen_name: impl Into<String>, render_time_ms: f64) -> Self {
        Self {
            screen_name: Some(screen_name.into()),
            render_time_ms: Some(render_time_ms),
            ..Self::new(EventKind::RenderTime)
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Canonical human-readable summary computed from the event fields.
    ///
    /// Pure: the same event always yields the same string.
    pub fn derive_message(&self) -> String {
        let screen = non_empty(self.screen_name.as_deref());
        match self.kind {
            EventKind::ScreenView => match (screen, self.variant) {
                (Some(screen), Some(variant)) => {
                    format!("Screen View: {screen} (Variant {variant})")
                }
                (Some(screen), None) => format!("Screen View: {screen}"),
                (None, _) => self.fallback_message(),
            },
            EventKind::ButtonClick => match (non_empty(self.button_name.as_deref()), screen) {
                (Some(button), Some(screen)) => format!("Button Click: {button} on {screen}"),
                (Some(button), None) => format!("Button Click: {button}"),
                (None, _) => self.fallback_message(),
            },
            EventKind::RenderTime => match (screen, self.render_time_ms) {
                (Some(screen), Some(ms)) => format!("Render Time: {screen} - {ms}ms"),
                (Some(screen), None) => format!("Render Time: {screen}"),
                (None, _) => self.fallback_message(),
            },
        }
    }

    fn fallback_message(&self) -> String {
        format!("Event: {}", self.kind)
    }

    /// The supplied message, or the derived one when absent.
    pub fn message(&self) -> Cow<'_, str> {
        match non_empty(self.message.as_deref()) {
            Some(message) => Cow::Borrowed(message),
            None => Cow::Owned(self.derive_message()),
        }
    }

    /// Fills `message` in place if the producer left it empty.
    pub fn ensure_message(&mut self) {
        if non_empty(self.message.as_deref()).is_none() {
            self.message = Some(self.derive_message());
        }
    }

    #[must_use]
    pub fn with_derived_message(mut self) -> Self {
        self.ensure_message();
        self
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
