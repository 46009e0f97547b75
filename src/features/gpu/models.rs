use serde::{Deserialize, Serialize};
use crate::shared::traits::Validatable;

/// Which diagnostic tool the collector talks to.
///
/// Starts as `Undetected` and only changes on an explicit detection run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GpuBackendState {
    #[default]
    Undetected,
    NoneAvailable,
    /// `name` is captured by the detection probe so commas in it cannot
    /// shift the positional metric fields.
    Nvidia { name: String },
    Apple,
    Amd,
}

impl GpuBackendState {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Nvidia { .. } | Self::Apple | Self::Amd)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Undetected => "undetected",
            Self::NoneAvailable => "none",
            Self::Nvidia { .. } => "nvidia",
            Self::Apple => "apple",
            Self::Amd => "amd",
        }
    }
}

/// One GPU reading. `None` means the backend could not provide the value;
/// zero is a real reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuMetrics {
    pub name: String,
    pub vendor: String,
    pub core_usage: Option<f64>,
    pub vram_total_mb: Option<f64>,
    pub vram_used_mb: Option<f64>,
    pub temperature_c: Option<f64>,
}

impl GpuMetrics {
    /// Drop values no backend can legitimately report: negative or
    /// non-finite VRAM and usage, non-finite temperature.
    pub fn sanitized(self) -> Self {
        let quantity = |value: Option<f64>| value.filter(|v| v.is_finite() && *v >= 0.0);
        Self {
            core_usage: quantity(self.core_usage),
            vram_total_mb: quantity(self.vram_total_mb),
            vram_used_mb: quantity(self.vram_used_mb),
            temperature_c: self.temperature_c.filter(|v| v.is_finite()),
            ..self
        }
    }
}

impl Validatable for GpuMetrics {
    fn validate(&self) -> Result<(), String> {
        let fields = [
            ("core_usage", self.core_usage),
            ("vram_total_mb", self.vram_total_mb),
            ("vram_used_mb", self.vram_used_mb),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                if value < 0.0 || !value.is_finite() {
                    return Err(format!("{} must be a non-negative number, got {}", field, value));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizing_drops_negative_quantities_only() {
        let metrics = GpuMetrics {
            name: String::from("NVIDIA RTX 3080"),
            vendor: String::from("NVIDIA"),
            core_usage: Some(f64::NAN),
            vram_total_mb: Some(-1.0),
            vram_used_mb: Some(0.0),
            temperature_c: Some(-5.0),
        };
        assert!(!metrics.is_valid());

        let metrics = metrics.sanitized();
        assert_eq!(metrics.core_usage, None);
        assert_eq!(metrics.vram_total_mb, None);
        assert_eq!(metrics.vram_used_mb, Some(0.0));
        assert_eq!(metrics.temperature_c, Some(-5.0));
        assert!(metrics.is_valid());
    }
}
