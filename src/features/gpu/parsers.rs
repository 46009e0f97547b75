//! Output parsers for the GPU diagnostic tools.
//!
//! Every parser is best-effort: a field that cannot be read comes back as
//! `None` instead of failing the whole reading.

use regex::Regex;
use serde_json::Value;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NvidiaReading {
    pub vram_total_mb: Option<f64>,
    pub vram_used_mb: Option<f64>,
    pub temperature_c: Option<f64>,
    pub core_usage: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VramReading {
    pub used_mb: Option<f64>,
    pub total_mb: Option<f64>,
}

fn parse_number(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn first_line(output: &str) -> Option<&str> {
    output.lines().map(str::trim).find(|line| !line.is_empty())
}

fn bytes_to_mb(bytes: f64) -> f64 {
    (bytes / BYTES_PER_MB).round()
}

/// First GPU name reported by `nvidia-smi --query-gpu=name`.
pub fn parse_nvidia_name(output: &str) -> Option<String> {
    first_line(output).map(str::to_string)
}

/// Positional `memory.total, memory.used, temperature.gpu, utilization.gpu`.
pub fn parse_nvidia_metrics(output: &str) -> NvidiaReading {
    let line = match first_line(output) {
        Some(line) => line,
        None => return NvidiaReading::default(),
    };
    let fields: Vec<&str> = line.split(',').collect();
    let field = |index: usize| fields.get(index).and_then(|value| parse_number(value));

    NvidiaReading {
        vram_total_mb: field(0),
        vram_used_mb: field(1),
        temperature_c: field(2),
        core_usage: field(3),
    }
}

/// Model of the first display entry in `system_profiler SPDisplaysDataType -json`.
pub fn parse_profiler_name(json: &str) -> Option<String> {
    let data: Value = serde_json::from_str(json).ok()?;
    let display = data.get("SPDisplaysDataType")?.as_array()?.first()?;
    ["sppci_model", "_name"]
        .iter()
        .filter_map(|key| display.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

fn capture_bytes(text: &str, key: &str) -> Option<f64> {
    let pattern = Regex::new(&format!(r#""{}"\s*=\s*(\d+)"#, regex::escape(key))).ok()?;
    let captures = pattern.captures(text)?;
    captures.get(1)?.as_str().parse::<u64>().ok().map(|bytes| bytes as f64)
}

/// VRAM figures from `ioreg -c IOAccelerator` performance statistics.
///
/// Total is only known when both used and free byte counts are present.
pub fn parse_ioreg_vram(text: &str) -> VramReading {
    let used = capture_bytes(text, "vramUsedBytes");
    let free = capture_bytes(text, "vramFreeBytes");

    VramReading {
        used_mb: used.map(bytes_to_mb),
        total_mb: used.zip(free).map(|(used, free)| bytes_to_mb(used + free)),
    }
}

/// `Card Series:` value from `rocm-smi --showproductname`.
pub fn parse_amd_product_name(text: &str) -> Option<String> {
    let pattern = Regex::new(r"(?i)Card Series:\s*(.+)").ok()?;
    let name = pattern.captures(text)?.get(1)?.as_str().trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// VRAM from `rocm-smi --showmeminfo vram --csv`, reported in bytes.
///
/// Columns are located through the header when it names them; otherwise the
/// first two numeric fields of the first data row are taken as used, total.
pub fn parse_amd_vram_csv(text: &str) -> VramReading {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let (header, row) = match (lines.next(), lines.next()) {
        (Some(header), Some(row)) => (header, row),
        _ => return VramReading::default(),
    };

    let headers: Vec<String> = header.split(',').map(|h| h.trim().to_lowercase()).collect();
    let values: Vec<&str> = row.split(',').collect();
    let column = |index: Option<usize>| index.and_then(|i| values.get(i)).and_then(|v| parse_number(v));

    let used_index = headers.iter().position(|h| h.contains("used"));
    let total_index = headers
        .iter()
        .position(|h| h.contains("total") && !h.contains("used"));

    let (used, total) = if used_index.is_some() && total_index.is_some() {
        (column(used_index), column(total_index))
    } else {
        let mut numbers = values.iter().filter_map(|v| parse_number(v));
        (numbers.next(), numbers.next())
    };

    VramReading {
        used_mb: used.map(bytes_to_mb),
        total_mb: total.map(bytes_to_mb),
    }
}

/// Second column of the first data row of a `rocm-smi ... --csv` table.
pub fn parse_amd_csv_value(text: &str) -> Option<f64> {
    let row = text.lines().map(str::trim).filter(|line| !line.is_empty()).nth(1)?;
    row.split(',').nth(1).and_then(parse_number)
}
