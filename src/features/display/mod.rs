mod status;
mod tooltip;

pub use status::{
    cpu_status_text,
    gpu_status_text,
    memory_status_text,
    StatusLine,
    Widget,
    WidgetUpdate,
    UNAVAILABLE,
};
pub use tooltip::{cpu_tooltip, gpu_tooltip, memory_tooltip};
