//! Producer-facing entry point.
//!
//! Application code records events through [`Telemetry`]; every call is
//! fire-and-forget and never reports delivery problems back to the caller.

use crate::buffer::EventBuffer;
use crate::dispatch::{BatchDispatcher, DispatchConfig, DispatchHandle, FlushOutcome};
use crate::domain::{EventKind, TelemetryEvent, Variant};
use crate::sender::{BatchTransmitter, Transport};
use crate::variant::VariantAssignment;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// An isolated telemetry pipeline: buffer, dispatcher and variant holder.
pub struct Telemetry<T = BatchTransmitter> {
    dispatcher: Arc<BatchDispatcher<T>>,
    variant: VariantAssignment,
}

impl<T: Transport + 'static> Telemetry<T> {
    pub fn new(transport: T, config: DispatchConfig) -> Self {
        let buffer = Arc::new(EventBuffer::new());
        Self {
            dispatcher: Arc::new(BatchDispatcher::new(buffer, transport, config)),
            variant: VariantAssignment::default(),
        }
    }

    pub fn dispatcher(&self) -> &Arc<BatchDispatcher<T>> {
        &self.dispatcher
    }

    pub fn variant(&self) -> &VariantAssignment {
        &self.variant
    }

    /// Starts periodic delivery. Keep the handle to stop it again.
    pub fn start(&self) -> DispatchHandle {
        self.dispatcher.start()
    }

    pub fn track(&self, mut event: TelemetryEvent) {
        event.ensure_message();
        debug!(kind = %event.kind, message = %event.message(), "Telemetry event recorded");
        self.dispatcher.enqueue(event);
    }

    pub fn log_screen_view(&self, screen_name: impl Into<String>, variant: Option<Variant>) {
        self.track(TelemetryEvent::screen_view(screen_name, variant));
    }

    /// Screen view tagged with the currently assigned variant.
    pub fn log_screen_view_with_assigned_variant(&self, screen_name: impl Into<String>) {
        self.log_screen_view(screen_name, Some(self.variant.variant()));
    }

    pub fn log_button_click(&self, button_name: impl Into<String>, screen_name: Option<String>) {
        self.track(TelemetryEvent::button_click(button_name, screen_name));
    }

    pub fn log_render_time(&self, screen_name: impl Into<String>, render_time_ms: f64) {
        self.track(TelemetryEvent::render_time(screen_name, render_time_ms));
    }

    /// Events recorded but not yet delivered.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.dispatcher.buffer().snapshot()
    }

    pub fn events_by_kind(&self, kind: EventKind) -> Vec<TelemetryEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.kind == kind)
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.dispatcher.buffer().pending_count()
    }

    /// Discards everything not yet delivered.
    pub fn clear(&self) -> usize {
        self.dispatcher.buffer().clear()
    }

    pub async fn flush(&self) -> FlushOutcome {
        self.dispatcher.flush().await
    }
}

/// Measures how long a screen took to render.
#[derive(Debug)]
pub struct RenderTimer {
    screen_name: String,
    started: Instant,
}

impl RenderTimer {
    pub fn start(screen_name: impl Into<String>) -> Self {
        Self {
            screen_name: screen_name.into(),
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Consumes the timer and records a RENDER_TIME event.
    pub fn finish<T: Transport + 'static>(self, telemetry: &Telemetry<T>) -> f64 {
        let elapsed = self.elapsed_ms();
        telemetry.log_render_time(self.screen_name, elapsed);
        elapsed
    }
}
