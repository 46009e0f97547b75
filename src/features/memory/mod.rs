mod collector;
mod models;

pub use collector::MemoryCollector;
pub use models::MemoryMetrics;
