use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::features::cpu::CpuMetrics;
use crate::features::gpu::GpuMetrics;
use crate::features::memory::MemoryMetrics;
use crate::shared::traits::{Identifiable, Validatable};

/// Everything collected in one polling tick. Disabled or unavailable
/// collectors leave their slot empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub category: String,
    pub cpu: Option<CpuMetrics>,
    pub memory: Option<MemoryMetrics>,
    pub gpu: Option<GpuMetrics>,
}

impl Identifiable for MetricsSnapshot {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }
}

impl Validatable for MetricsSnapshot {
    fn validate(&self) -> Result<(), String> {
        if let Some(cpu) = &self.cpu {
            cpu.validate()?;
        }
        if let Some(memory) = &self.memory {
            memory.validate()?;
        }
        if let Some(gpu) = &self.gpu {
            gpu.validate()?;
        }
        Ok(())
    }
}

// Builder pattern for MetricsSnapshot
#[derive(Default)]
pub struct MetricsSnapshotBuilder {
    id: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    source: Option<String>,
    category: Option<String>,
    cpu: Option<CpuMetrics>,
    memory: Option<MemoryMetrics>,
    gpu: Option<GpuMetrics>,
}

impl MetricsSnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: String) -> Self {
        self.id = Some(id);
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn source(mut self, source: String) -> Self {
        self.source = Some(source);
        self
    }

    pub fn category(mut self, category: String) -> Self {
        self.category = Some(category);
        self
    }

    pub fn cpu(mut self, cpu: Option<CpuMetrics>) -> Self {
        self.cpu = cpu;
        self
    }

    pub fn memory(mut self, memory: Option<MemoryMetrics>) -> Self {
        self.memory = memory;
        self
    }

    pub fn gpu(mut self, gpu: Option<GpuMetrics>) -> Self {
        self.gpu = gpu;
        self
    }

    pub fn build(self) -> Result<MetricsSnapshot, String> {
        let snapshot = MetricsSnapshot {
            id: self.id.ok_or("id is required")?,
            timestamp: self.timestamp.ok_or("timestamp is required")?,
            source: self.source.ok_or("source is required")?,
            category: self.category.ok_or("category is required")?,
            cpu: self.cpu,
            memory: self.memory,
            gpu: self.gpu,
        };

        snapshot.validate()?;
        Ok(snapshot)
    }
}
