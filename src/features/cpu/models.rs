use serde::{Deserialize, Serialize};
use crate::shared::traits::Validatable;

/// Cumulative counters for one core, as read at a single instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub idle: u64,
    pub total: u64,
}

impl TickSnapshot {
    pub fn new(idle: u64, total: u64) -> Self {
        Self { idle, total }
    }
}

/// Everything a tick source reports in one read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReading {
    pub cores: Vec<TickSnapshot>,
    pub model: Option<String>,
    pub speed_mhz: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuMetrics {
    pub overall: f64,
    pub cores: Vec<f64>,
    pub model: String,
    pub speed_mhz: u64,
}

impl Validatable for CpuMetrics {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.overall) {
            return Err(format!("Overall CPU usage {} is outside 0-100", self.overall));
        }
        for (index, usage) in self.cores.iter().enumerate() {
            if !(0.0..=100.0).contains(usage) {
                return Err(format!("Usage {} of core {} is outside 0-100", usage, index));
            }
        }
        Ok(())
    }
}

/// Round to one decimal place, halves away from zero.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
