//! Markdown tooltips: a header-less two-column table per collector.

use crate::features::cpu::CpuMetrics;
use crate::features::gpu::GpuMetrics;
use crate::features::memory::MemoryMetrics;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

fn table(rows: &[(&str, String)]) -> String {
    let mut markdown = String::from("| | |\n|---|---|\n");
    for (key, value) in rows {
        markdown.push_str(&format!("| **{}** | {} |\n", key, value));
    }
    markdown
}

fn format_gib(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / GIB)
}

pub fn cpu_tooltip(cpu: &CpuMetrics) -> String {
    table(&[
        ("Model", cpu.model.clone()),
        ("Cores", cpu.cores.len().to_string()),
        ("Speed", format!("{} MHz", cpu.speed_mhz)),
    ])
}

pub fn memory_tooltip(memory: &MemoryMetrics) -> String {
    table(&[
        ("Total", format!("{} GB", format_gib(memory.total_bytes))),
        ("Used", format!("{} GB", format_gib(memory.used_bytes))),
        ("Free", format!("{} GB", format_gib(memory.free_bytes))),
    ])
}

/// Rows for unavailable fields are left out.
pub fn gpu_tooltip(gpu: &GpuMetrics) -> String {
    let mut rows = vec![("Name", gpu.name.clone()), ("Vendor", gpu.vendor.clone())];

    if let Some(usage) = gpu.core_usage {
        rows.push(("Core Usage", format!("{:.1}%", usage)));
    }
    match (gpu.vram_used_mb, gpu.vram_total_mb) {
        (Some(used), Some(total)) => {
            rows.push(("VRAM", format!("{:.1}/{:.1} GB", used / 1024.0, total / 1024.0)));
        }
        (Some(used), None) => rows.push(("VRAM Used", format!("{:.1} GB", used / 1024.0))),
        _ => {}
    }
    if let Some(temperature) = gpu.temperature_c {
        rows.push(("Temperature", format!("{}\u{00B0}C", temperature)));
    }

    table(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_tooltip_lists_model_cores_speed() {
        let cpu = CpuMetrics {
            overall: 12.5,
            cores: vec![10.0, 15.0],
            model: String::from("AMD Ryzen 7 5800X"),
            speed_mhz: 3800,
        };
        assert_eq!(
            cpu_tooltip(&cpu),
            "| | |\n|---|---|\n| **Model** | AMD Ryzen 7 5800X |\n| **Cores** | 2 |\n| **Speed** | 3800 MHz |\n"
        );
    }

    #[test]
    fn memory_tooltip_formats_gigabytes() {
        let memory = MemoryMetrics::from_totals(8 * 1024 * 1024 * 1024, 2 * 1024 * 1024 * 1024);
        let tooltip = memory_tooltip(&memory);
        assert!(tooltip.contains("| **Total** | 8.0 GB |"));
        assert!(tooltip.contains("| **Used** | 6.0 GB |"));
        assert!(tooltip.contains("| **Free** | 2.0 GB |"));
    }

    #[test]
    fn gpu_tooltip_skips_missing_fields() {
        let gpu = GpuMetrics {
            name: String::from("Apple M1"),
            vendor: String::from("Apple"),
            core_usage: None,
            vram_total_mb: None,
            vram_used_mb: Some(1536.0),
            temperature_c: None,
        };
        let tooltip = gpu_tooltip(&gpu);
        assert!(tooltip.contains("| **VRAM Used** | 1.5 GB |"));
        assert!(!tooltip.contains("Core Usage"));
        assert!(!tooltip.contains("Temperature"));
    }

    #[test]
    fn gpu_tooltip_shows_zero_readings() {
        let gpu = GpuMetrics {
            name: String::from("NVIDIA RTX 3080"),
            vendor: String::from("NVIDIA"),
            core_usage: Some(0.0),
            vram_total_mb: Some(10240.0),
            vram_used_mb: Some(0.0),
            temperature_c: Some(0.0),
        };
        let tooltip = gpu_tooltip(&gpu);
        assert!(tooltip.contains("| **Core Usage** | 0.0% |"));
        assert!(tooltip.contains("| **VRAM** | 0.0/10.0 GB |"));
        assert!(tooltip.contains("| **Temperature** | 0\u{00B0}C |"));
    }
}
