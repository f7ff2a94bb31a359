pub mod row;
pub mod store;

pub use row::{CountRow, EventRow};
pub use store::ClickHouseEventStore;
