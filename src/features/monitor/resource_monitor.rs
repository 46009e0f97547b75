use crate::features::cpu::{CpuCollector, HostTickSource, TickSource};
use crate::features::gpu::GpuCollector;
use crate::features::memory::MemoryCollector;
use crate::features::monitor::models::{MetricsSnapshot, MetricsSnapshotBuilder};
use crate::shared::config::MonitorConfig;
use crate::shared::error::{CollectionError, MonitorError};
use crate::shared::process::{CommandRunner, SystemCommandRunner};
use crate::shared::traits::AsyncDataCollector;
use chrono::Utc;
use log::{debug, info};
use uuid::Uuid;

/// Owns every collector and the state they carry between ticks.
///
/// Each tick samples CPU, then memory, then the GPU when one was detected.
/// Callers await a tick before starting the next one.
pub struct ResourceMonitor<S: TickSource = HostTickSource, R: CommandRunner = SystemCommandRunner> {
    config: MonitorConfig,
    cpu: CpuCollector<S>,
    memory: MemoryCollector,
    gpu: GpuCollector<R>,
    gpu_available: bool,
    hostname: String,
}

impl ResourceMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_collectors(config, CpuCollector::new(), GpuCollector::new())
    }
}

impl<S: TickSource + Send + Sync, R: CommandRunner> ResourceMonitor<S, R> {
    pub fn with_collectors(config: MonitorConfig, cpu: CpuCollector<S>, gpu: GpuCollector<R>) -> Self {
        Self {
            config,
            cpu,
            memory: MemoryCollector::new(),
            gpu,
            gpu_available: false,
            hostname: whoami::hostname(),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn gpu_available(&self) -> bool {
        self.gpu_available
    }

    /// Run GPU detection once, if the GPU is shown at all.
    pub async fn start(&mut self) -> bool {
        if self.config.show_gpu {
            self.redetect_gpu().await
        } else {
            info!("GPU monitoring disabled");
            false
        }
    }

    pub async fn redetect_gpu(&mut self) -> bool {
        self.gpu_available = self.gpu.detect().await;
        self.gpu_available
    }

    /// Swap in a new configuration. Turning the GPU on triggers a new detection.
    pub async fn update_config(&mut self, config: MonitorConfig) {
        let gpu_enabled = config.show_gpu && !self.config.show_gpu;
        self.config = config;
        if gpu_enabled {
            self.redetect_gpu().await;
        } else if !self.config.show_gpu {
            self.gpu_available = false;
        }
    }

    pub async fn tick(&mut self) -> Result<MetricsSnapshot, MonitorError> {
        let cpu = if self.config.show_cpu {
            Some(AsyncDataCollector::collect(&mut self.cpu).await?)
        } else {
            None
        };
        let memory = if self.config.show_memory {
            Some(AsyncDataCollector::collect(&mut self.memory).await?)
        } else {
            None
        };
        let gpu = if self.config.show_gpu && self.gpu_available {
            AsyncDataCollector::collect(&mut self.gpu).await?
        } else {
            None
        };

        let snapshot = MetricsSnapshotBuilder::new()
            .id(Uuid::new_v4().to_string())
            .timestamp(Utc::now())
            .source(self.hostname.clone())
            .category(String::from("resources"))
            .cpu(cpu)
            .memory(memory)
            .gpu(gpu)
            .build()
            .map_err(CollectionError::Parse)?;

        debug!("Collected snapshot {}", snapshot.id);
        Ok(snapshot)
    }
}
