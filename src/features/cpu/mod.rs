mod collector;
mod models;

pub use collector::{
    core_usages,
    overall_usage,
    parse_proc_stat,
    CpuCollector,
    HostTickSource,
    TickSource,
};
pub use models::{round_tenth, CpuMetrics, TickReading, TickSnapshot};
