pub mod filter;
pub mod stats;
pub mod stored_event;

pub use beacon_event::{EventKind, TelemetryEvent, ValidationError, Variant, kind_of, validate};
pub use filter::{DateRange, EventFilter, Page, Pagination};
pub use stats::{CountBucket, EventStats};
pub use stored_event::StoredEvent;
