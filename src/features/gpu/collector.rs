use crate::shared::traits::{AsyncDataCollector, Validatable};
use crate::shared::error::{CollectionError, ProcessError};
use crate::shared::process::{command_exists, CommandRunner, SystemCommandRunner, DEFAULT_TIMEOUT_MS};
use crate::features::gpu::models::{GpuBackendState, GpuMetrics};
use crate::features::gpu::parsers::{
    parse_amd_csv_value, parse_amd_product_name, parse_amd_vram_csv, parse_ioreg_vram,
    parse_nvidia_metrics, parse_nvidia_name, parse_profiler_name,
};
use log::{debug, info, warn};

/// Timeout for each detection probe.
pub const PROBE_TIMEOUT_MS: u64 = 2000;

const NVIDIA_SMI: &str = "nvidia-smi";
const SYSTEM_PROFILER: &str = "system_profiler";
const IOREG: &str = "ioreg";
const ROCM_SMI: &str = "rocm-smi";

const NVIDIA_NAME_ARGS: &[&str] = &["--query-gpu=name", "--format=csv,noheader"];
const NVIDIA_METRICS_ARGS: &[&str] = &[
    "--query-gpu=memory.total,memory.used,temperature.gpu,utilization.gpu",
    "--format=csv,noheader,nounits",
];
const PROFILER_ARGS: &[&str] = &["SPDisplaysDataType", "-json"];
const IOREG_ARGS: &[&str] = &["-r", "-d", "1", "-w", "0", "-c", "IOAccelerator"];

/// Detects one GPU backend through its diagnostic CLI, then queries it.
///
/// The last successful reading is kept and handed back whenever a later
/// query fails.
pub struct GpuCollector<R: CommandRunner = SystemCommandRunner> {
    runner: R,
    state: GpuBackendState,
    last_good: Option<GpuMetrics>,
    probe_platform_profiler: bool,
}

impl GpuCollector<SystemCommandRunner> {
    pub fn new() -> Self {
        Self::with_runner(SystemCommandRunner::new())
    }
}

impl<R: CommandRunner> GpuCollector<R> {
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            state: GpuBackendState::Undetected,
            last_good: None,
            probe_platform_profiler: cfg!(target_os = "macos"),
        }
    }

    /// Override whether the macOS display profiler is probed. Defaults to
    /// true only on macOS.
    pub fn with_platform_profiler(mut self, enabled: bool) -> Self {
        self.probe_platform_profiler = enabled;
        self
    }

    pub fn state(&self) -> &GpuBackendState {
        &self.state
    }

    pub fn last_reading(&self) -> Option<&GpuMetrics> {
        self.last_good.as_ref()
    }

    /// Probe NVIDIA, the macOS profiler, then AMD ROCm; the first success wins.
    pub async fn detect(&mut self) -> bool {
        self.state = self.detect_backend().await;
        info!("GPU backend detection: {}", self.state.label());
        self.state.is_available()
    }

    async fn detect_backend(&self) -> GpuBackendState {
        match self.runner.run(NVIDIA_SMI, NVIDIA_NAME_ARGS, PROBE_TIMEOUT_MS).await {
            Ok(output) => {
                let name = parse_nvidia_name(&output).unwrap_or_else(|| String::from("NVIDIA GPU"));
                return GpuBackendState::Nvidia { name };
            }
            Err(e) => debug!("NVIDIA probe failed: {}", e),
        }

        if self.probe_platform_profiler {
            match self.runner.run(SYSTEM_PROFILER, PROFILER_ARGS, PROBE_TIMEOUT_MS).await {
                Ok(_) => return GpuBackendState::Apple,
                Err(e) => debug!("Display profiler probe failed: {}", e),
            }
        }

        match self.runner.run(ROCM_SMI, &["--showid"], PROBE_TIMEOUT_MS).await {
            Ok(_) => return GpuBackendState::Amd,
            Err(e) => debug!("ROCm probe failed: {}", e),
        }

        GpuBackendState::NoneAvailable
    }

    /// Read the detected GPU, detecting first if that never happened.
    ///
    /// `None` means no GPU backend, or a failed query with nothing cached.
    pub async fn collect_gpu(&mut self) -> Option<GpuMetrics> {
        if self.state == GpuBackendState::Undetected {
            self.detect().await;
        }

        let result = match &self.state {
            GpuBackendState::Undetected | GpuBackendState::NoneAvailable => return None,
            GpuBackendState::Nvidia { name } => self.query_nvidia(name).await,
            GpuBackendState::Apple => self.query_apple().await,
            GpuBackendState::Amd => Ok(self.query_amd().await),
        };

        match result {
            Ok(metrics) => {
                let metrics = metrics.sanitized();
                debug!("GPU reading: {:?}", metrics);
                self.last_good = Some(metrics.clone());
                Some(metrics)
            }
            Err(e) => {
                warn!("GPU query failed, returning last reading: {}", e);
                self.last_good.clone()
            }
        }
    }

    async fn query_nvidia(&self, name: &str) -> Result<GpuMetrics, ProcessError> {
        let output = self.runner.run(NVIDIA_SMI, NVIDIA_METRICS_ARGS, DEFAULT_TIMEOUT_MS).await?;
        let reading = parse_nvidia_metrics(&output);

        Ok(GpuMetrics {
            name: name.to_string(),
            vendor: String::from("NVIDIA"),
            core_usage: reading.core_usage,
            vram_total_mb: reading.vram_total_mb,
            vram_used_mb: reading.vram_used_mb,
            temperature_c: reading.temperature_c,
        })
    }

    async fn query_apple(&self) -> Result<GpuMetrics, ProcessError> {
        let profile = self.runner.run(SYSTEM_PROFILER, PROFILER_ARGS, DEFAULT_TIMEOUT_MS).await?;
        let name = parse_profiler_name(&profile).unwrap_or_else(|| String::from("Apple GPU"));

        // Not every Mac exposes accelerator statistics.
        let vram = match self.runner.run(IOREG, IOREG_ARGS, DEFAULT_TIMEOUT_MS).await {
            Ok(output) => parse_ioreg_vram(&output),
            Err(e) => {
                debug!("ioreg query failed: {}", e);
                Default::default()
            }
        };

        Ok(GpuMetrics {
            name,
            vendor: String::from("Apple"),
            core_usage: None,
            vram_total_mb: vram.total_mb,
            vram_used_mb: vram.used_mb,
            temperature_c: None,
        })
    }

    async fn query_amd(&self) -> GpuMetrics {
        let name = self
            .run_optional(&["--showproductname"])
            .await
            .and_then(|output| parse_amd_product_name(&output))
            .unwrap_or_else(|| String::from("AMD GPU"));
        let vram = self
            .run_optional(&["--showmeminfo", "vram", "--csv"])
            .await
            .map(|output| parse_amd_vram_csv(&output))
            .unwrap_or_default();
        let temperature_c = self
            .run_optional(&["-t", "--csv"])
            .await
            .and_then(|output| parse_amd_csv_value(&output));
        let core_usage = self
            .run_optional(&["-u", "--csv"])
            .await
            .and_then(|output| parse_amd_csv_value(&output));

        GpuMetrics {
            name,
            vendor: String::from("AMD"),
            core_usage,
            vram_total_mb: vram.total_mb,
            vram_used_mb: vram.used_mb,
            temperature_c,
        }
    }

    async fn run_optional(&self, args: &[&str]) -> Option<String> {
        match self.runner.run(ROCM_SMI, args, DEFAULT_TIMEOUT_MS).await {
            Ok(output) => Some(output),
            Err(e) => {
                debug!("rocm-smi {:?} failed: {}", args, e);
                None
            }
        }
    }

    fn internal_validate(&self) -> Result<(), CollectionError> {
        let mut tools = vec![NVIDIA_SMI, ROCM_SMI];
        if self.probe_platform_profiler {
            tools.push(SYSTEM_PROFILER);
        }
        if tools.iter().any(|tool| command_exists(tool)) {
            Ok(())
        } else {
            Err(CollectionError::SystemApi("No GPU diagnostic tool found on PATH".to_string()))
        }
    }
}

#[async_trait::async_trait]
impl<R: CommandRunner> AsyncDataCollector<Option<GpuMetrics>> for GpuCollector<R> {
    async fn collect(&mut self) -> Result<Option<GpuMetrics>, CollectionError> {
        let metrics = self.collect_gpu().await;
        if let Some(metrics) = &metrics {
            metrics.validate().map_err(CollectionError::Parse)?;
        }
        Ok(metrics)
    }

    async fn validate(&self) -> Result<(), CollectionError> {
        self.internal_validate()
    }

    async fn health_check(&self) -> bool {
        self.internal_validate().is_ok()
    }
}

impl Default for GpuCollector<SystemCommandRunner> {
    fn default() -> Self {
        Self::new()
    }
}
