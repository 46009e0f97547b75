use crate::shared::traits::{AsyncDataCollector, DataCollector, Validatable};
use crate::shared::error::CollectionError;
use crate::features::memory::models::MemoryMetrics;
use log::debug;
use sysinfo::System;

/// Point-in-time physical memory reader. Keeps no state between calls.
pub struct MemoryCollector {
    sys: System,
}

impl MemoryCollector {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }

    pub fn sample(&mut self) -> Result<MemoryMetrics, CollectionError> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(CollectionError::SystemApi("No memory information available".to_string()));
        }

        let metrics = MemoryMetrics::from_totals(total, self.sys.available_memory());
        debug!(
            "Sampled memory: {} of {} bytes used",
            metrics.used_bytes, metrics.total_bytes
        );
        Ok(metrics)
    }

    fn internal_validate(&self) -> Result<(), CollectionError> {
        let mut probe = System::new();
        probe.refresh_memory();
        if probe.total_memory() > 0 {
            Ok(())
        } else {
            Err(CollectionError::SystemApi("No memory information available".to_string()))
        }
    }
}

impl DataCollector<MemoryMetrics> for MemoryCollector {
    fn collect(&mut self) -> Result<MemoryMetrics, CollectionError> {
        let metrics = self.sample()?;
        metrics.validate().map_err(CollectionError::Parse)?;
        Ok(metrics)
    }

    fn validate(&self) -> Result<(), CollectionError> {
        self.internal_validate()
    }

    fn health_check(&self) -> bool {
        self.internal_validate().is_ok()
    }
}

#[async_trait::async_trait]
impl AsyncDataCollector<MemoryMetrics> for MemoryCollector {
    async fn collect(&mut self) -> Result<MemoryMetrics, CollectionError> {
        DataCollector::collect(self)
    }

    async fn validate(&self) -> Result<(), CollectionError> {
        self.internal_validate()
    }

    async fn health_check(&self) -> bool {
        self.internal_validate().is_ok()
    }
}

impl Default for MemoryCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_memory_adds_up() {
        let mut collector = MemoryCollector::new();
        let metrics = DataCollector::collect(&mut collector).unwrap();
        assert!(metrics.total_bytes > 0);
        assert_eq!(metrics.used_bytes + metrics.free_bytes, metrics.total_bytes);
        assert!((0.0..=100.0).contains(&metrics.usage_percent()));
    }

    #[tokio::test]
    async fn async_collect_reports_host_memory() {
        let mut collector = MemoryCollector::new();
        assert!(AsyncDataCollector::health_check(&collector).await);
        let metrics = AsyncDataCollector::collect(&mut collector).await.unwrap();
        assert!(metrics.is_valid());
    }
}
