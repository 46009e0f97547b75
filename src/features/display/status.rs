use crate::features::cpu::CpuMetrics;
use crate::features::display::tooltip::{cpu_tooltip, gpu_tooltip, memory_tooltip};
use crate::features::gpu::GpuMetrics;
use crate::features::memory::MemoryMetrics;
use crate::features::monitor::MetricsSnapshot;
use crate::shared::config::MonitorConfig;

/// Shown for a GPU that is absent or reports no VRAM figures.
pub const UNAVAILABLE: &str = "N/A";

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    Cpu,
    Memory,
    Gpu,
}

impl Widget {
    pub fn label(&self) -> &'static str {
        match self {
            Widget::Cpu => "CPU",
            Widget::Memory => "RAM",
            Widget::Gpu => "VRAM",
        }
    }

    fn index(&self) -> usize {
        match self {
            Widget::Cpu => 0,
            Widget::Memory => 1,
            Widget::Gpu => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetUpdate {
    Hidden,
    Unchanged,
    Changed { text: String, tooltip: Option<String> },
}

pub fn cpu_status_text(cpu: &CpuMetrics) -> String {
    format!("{:>4.1}%", cpu.overall)
}

pub fn memory_status_text(memory: &MemoryMetrics) -> String {
    format!(
        "{:.1}/{:.1} GB",
        memory.used_bytes as f64 / GIB,
        memory.total_bytes as f64 / GIB
    )
}

pub fn gpu_status_text(gpu: Option<&GpuMetrics>) -> String {
    match gpu.map(|gpu| (gpu.vram_used_mb, gpu.vram_total_mb)) {
        Some((Some(used), Some(total))) => format!("{:.1}/{:.1} GB", used / 1024.0, total / 1024.0),
        Some((Some(used), None)) => format!("{:.1} GB", used / 1024.0),
        _ => UNAVAILABLE.to_string(),
    }
}

/// Remembers the last text shown per widget so unchanged values are not
/// re-rendered.
#[derive(Debug, Default)]
pub struct StatusLine {
    last: [Option<String>; 3],
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, snapshot: &MetricsSnapshot, config: &MonitorConfig) -> Vec<(Widget, WidgetUpdate)> {
        let cpu = config.show_cpu.then(|| {
            snapshot
                .cpu
                .as_ref()
                .map(|cpu| (cpu_status_text(cpu), Some(cpu_tooltip(cpu))))
                .unwrap_or_else(|| (UNAVAILABLE.to_string(), None))
        });
        let memory = config.show_memory.then(|| {
            snapshot
                .memory
                .as_ref()
                .map(|memory| (memory_status_text(memory), Some(memory_tooltip(memory))))
                .unwrap_or_else(|| (UNAVAILABLE.to_string(), None))
        });
        let gpu = config
            .show_gpu
            .then(|| (gpu_status_text(snapshot.gpu.as_ref()), snapshot.gpu.as_ref().map(gpu_tooltip)));

        vec![
            (Widget::Cpu, self.update(Widget::Cpu, cpu)),
            (Widget::Memory, self.update(Widget::Memory, memory)),
            (Widget::Gpu, self.update(Widget::Gpu, gpu)),
        ]
    }

    fn update(&mut self, widget: Widget, rendered: Option<(String, Option<String>)>) -> WidgetUpdate {
        let slot = &mut self.last[widget.index()];
        match rendered {
            None => {
                *slot = None;
                WidgetUpdate::Hidden
            }
            Some((text, _)) if slot.as_deref() == Some(text.as_str()) => WidgetUpdate::Unchanged,
            Some((text, tooltip)) => {
                *slot = Some(text.clone());
                WidgetUpdate::Changed { text, tooltip }
            }
        }
    }

    /// One-line summary of the visible widgets, e.g. `CPU 12.5% | RAM 6.0/8.0 GB`.
    pub fn summary(&self) -> String {
        [Widget::Cpu, Widget::Memory, Widget::Gpu]
            .iter()
            .filter_map(|widget| {
                self.last[widget.index()]
                    .as_ref()
                    .map(|text| format!("{} {}", widget.label(), text.trim()))
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
