//! Drives buffered events to the collector.
//!
//! A [`BatchDispatcher`] drains the [`EventBuffer`](crate::buffer::EventBuffer)
//! in fixed-size batches, one delivery cycle at a time. Cycles are started by
//! a periodic timer, by the buffer becoming non-empty, or by calling
//! [`BatchDispatcher::flush`] directly.

pub mod dispatcher;
pub mod schedule;

pub use dispatcher::{
    BatchDispatcher, DispatchConfig, DispatchState, DispatchStats, DispatchStatsSnapshot,
    FlushOutcome, FlushSummary,
};
pub use schedule::DispatchHandle;
