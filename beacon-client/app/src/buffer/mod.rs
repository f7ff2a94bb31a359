pub mod batch;
pub mod metrics;
pub mod queue;

pub use batch::{Batch, BatchPayload};
pub use metrics::{BufferMetrics, BufferMetricsSnapshot};
pub use queue::{BufferedEvent, EventBuffer};
