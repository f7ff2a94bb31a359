#![warn(rust_2024_compatibility)]
// Specific pedantic lints (not blanket allow):
#![warn(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::cast_possible_truncation, // Millisecond durations fit comfortably in u64
    clippy::cast_precision_loss,      // Render times are reported as f64 milliseconds
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

pub mod app;
pub mod buffer;
pub mod dispatch;
pub mod domain;
pub mod sender;
pub mod telemetry;
pub mod variant;

pub use app::{App, Config};
pub use buffer::{Batch, BufferedEvent, EventBuffer};
pub use dispatch::{BatchDispatcher, DispatchHandle, DispatchState, FlushOutcome, FlushSummary};
pub use domain::{EventKind, TelemetryEvent, ValidationError, Variant};
pub use sender::{BatchTransmitter, DeliveryOutcome, HttpClient, Transport};
pub use telemetry::{RenderTimer, Telemetry};
pub use variant::VariantAssignment;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
