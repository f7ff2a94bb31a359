#![warn(rust_2018_idioms)]
//! Wire model for telemetry events.
//!
//! Shared by the client pipeline and the collector:
//! - `TelemetryEvent`: the typed event, with deterministic message derivation
//! - `EventKind` / `Variant`: closed sets accepted at the boundary
//! - `validate` / `kind_of`: raw JSON to typed event, with `ValidationError`

pub mod error;
pub mod event;
pub mod kind;
pub mod validate;

pub use error::ValidationError;
pub use event::{TelemetryEvent, now_millis};
pub use kind::{EventKind, Variant};
pub use validate::{kind_of, validate};
