pub mod clickhouse;
pub mod memory;

pub use self::clickhouse::ClickHouseEventStore;
pub use memory::MemoryEventStore;
