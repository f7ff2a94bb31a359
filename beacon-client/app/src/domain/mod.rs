//! Domain layer for beacon-client.
//!
//! Re-exports the shared event model and holds the client's top-level error:
//! - `TelemetryEvent`, `EventKind`, `Variant`: wire model from `beacon-event`
//! - `ClientAppError`: errors surfaced by the forwarding binary

pub mod error;

pub use beacon_event::{EventKind, TelemetryEvent, ValidationError, Variant, kind_of, validate};
pub use error::{ClientAppError, IngestError};
