use serde::{Deserialize, Serialize};
use crate::shared::traits::Validatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryMetrics {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
}

impl MemoryMetrics {
    /// Build from the two figures the OS reports. Free is capped at total.
    pub fn from_totals(total_bytes: u64, free_bytes: u64) -> Self {
        let free_bytes = free_bytes.min(total_bytes);
        Self {
            total_bytes,
            used_bytes: total_bytes - free_bytes,
            free_bytes,
        }
    }

    /// Used share of total, one decimal place. 0 when total is 0.
    pub fn usage_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        (self.used_bytes as f64 / self.total_bytes as f64 * 1000.0).round() / 10.0
    }
}

impl Validatable for MemoryMetrics {
    fn validate(&self) -> Result<(), String> {
        if self.used_bytes.checked_add(self.free_bytes) != Some(self.total_bytes) {
            return Err(format!(
                "Used ({}) and free ({}) memory do not add up to total ({})",
                self.used_bytes, self.free_bytes, self.total_bytes
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn used_is_total_minus_free() {
        let metrics = MemoryMetrics::from_totals(8 * GIB, 2 * GIB);
        assert_eq!(metrics.used_bytes, 6 * GIB);
        assert_eq!(metrics.free_bytes, 2 * GIB);
        assert_eq!(metrics.usage_percent(), 75.0);
        assert!(metrics.is_valid());
    }

    #[test]
    fn usage_percent_rounds_to_one_decimal() {
        assert_eq!(MemoryMetrics::from_totals(3000, 2000).usage_percent(), 33.3);
    }

    #[test]
    fn zero_total_reports_zero_usage() {
        let metrics = MemoryMetrics::from_totals(0, 0);
        assert_eq!(metrics.usage_percent(), 0.0);
        assert!(metrics.is_valid());
    }

    #[test]
    fn free_above_total_is_capped() {
        let metrics = MemoryMetrics::from_totals(1000, 1500);
        assert_eq!(metrics.used_bytes, 0);
        assert_eq!(metrics.free_bytes, 1000);
    }

    #[test]
    fn inconsistent_figures_fail_validation() {
        let metrics = MemoryMetrics {
            total_bytes: 100,
            used_bytes: 60,
            free_bytes: 50,
        };
        assert!(!metrics.is_valid());
    }
}
