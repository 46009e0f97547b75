pub mod features;
pub mod shared;

// Re-export commonly used items from features
pub use features::cpu::{CpuCollector, CpuMetrics, HostTickSource, TickReading, TickSnapshot, TickSource};
pub use features::memory::{MemoryCollector, MemoryMetrics};
pub use features::gpu::{GpuBackendState, GpuCollector, GpuMetrics};
pub use features::monitor::{MetricsSnapshot, ResourceMonitor};
pub use features::display::{StatusLine, Widget, WidgetUpdate};

// Re-export shared functionality
pub use shared::traits::{
    AsyncDataCollector,
    DataCollector,
    Identifiable,
    Validatable,
};
pub use shared::error::{
    CollectionError,
    ConfigError,
    MonitorError,
    ProcessError,
};
pub use shared::config::{MonitorConfig, OutputFormat};
pub use shared::process::{CommandRunner, SystemCommandRunner, DEFAULT_TIMEOUT_MS};
