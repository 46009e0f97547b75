mod collector;
mod models;
mod parsers;

pub use collector::{GpuCollector, PROBE_TIMEOUT_MS};
pub use models::{GpuBackendState, GpuMetrics};
pub use parsers::{
    parse_amd_csv_value,
    parse_amd_product_name,
    parse_amd_vram_csv,
    parse_ioreg_vram,
    parse_nvidia_metrics,
    parse_nvidia_name,
    parse_profiler_name,
    NvidiaReading,
    VramReading,
};
