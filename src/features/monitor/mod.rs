mod models;
mod resource_monitor;

pub use models::{MetricsSnapshot, MetricsSnapshotBuilder};
pub use resource_monitor::ResourceMonitor;
