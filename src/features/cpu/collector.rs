use crate::shared::traits::{AsyncDataCollector, DataCollector, Validatable};
use crate::shared::error::CollectionError;
use crate::features::cpu::models::{round_tenth, CpuMetrics, TickReading, TickSnapshot};
use log::debug;
use sysinfo::System;

/// Source of per-core cumulative tick counters.
pub trait TickSource {
    fn read(&mut self) -> Result<TickReading, CollectionError>;
    fn core_count(&self) -> usize;
}

/// Reads the host's counters.
///
/// On Linux the counters come straight from `/proc/stat`. Elsewhere they are
/// accumulated from the per-refresh usage `sysinfo` reports, 1000 ticks per read.
pub struct HostTickSource {
    sys: System,
    #[cfg(not(target_os = "linux"))]
    accumulated: Vec<TickSnapshot>,
}

impl HostTickSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        Self {
            sys,
            #[cfg(not(target_os = "linux"))]
            accumulated: Vec::new(),
        }
    }

    #[cfg(target_os = "linux")]
    fn read_cores(&mut self) -> Result<Vec<TickSnapshot>, CollectionError> {
        let stat = std::fs::read_to_string("/proc/stat")?;
        parse_proc_stat(&stat)
    }

    #[cfg(not(target_os = "linux"))]
    fn read_cores(&mut self) -> Result<Vec<TickSnapshot>, CollectionError> {
        let cpus = self.sys.cpus();
        if self.accumulated.len() != cpus.len() {
            self.accumulated = vec![TickSnapshot::default(); cpus.len()];
        }
        for (ticks, cpu) in self.accumulated.iter_mut().zip(cpus) {
            let busy = (f64::from(cpu.cpu_usage()).clamp(0.0, 100.0) * 10.0).round() as u64;
            ticks.total += 1000;
            ticks.idle += 1000 - busy;
        }
        Ok(self.accumulated.clone())
    }
}

impl TickSource for HostTickSource {
    fn read(&mut self) -> Result<TickReading, CollectionError> {
        self.sys.refresh_cpu_all();
        let cores = self.read_cores()?;
        if cores.is_empty() {
            return Err(CollectionError::SystemApi("No CPU cores reported".to_string()));
        }

        let first = self.sys.cpus().first();
        Ok(TickReading {
            cores,
            model: first.map(|cpu| cpu.brand().trim().to_string()).filter(|brand| !brand.is_empty()),
            speed_mhz: first.map(|cpu| cpu.frequency()),
        })
    }

    fn core_count(&self) -> usize {
        self.sys.cpus().len()
    }
}

impl Default for HostTickSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the per-core `cpuN` lines of `/proc/stat`.
///
/// total = user + nice + system + idle + irq; the aggregate `cpu` line is skipped.
pub fn parse_proc_stat(stat: &str) -> Result<Vec<TickSnapshot>, CollectionError> {
    let mut cores = Vec::new();

    for line in stat.lines() {
        let mut fields = line.split_whitespace();
        let label = match fields.next() {
            Some(label) => label,
            None => continue,
        };
        let is_core = label
            .strip_prefix("cpu")
            .map(|index| !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false);
        if !is_core {
            continue;
        }

        let values = fields
            .map(|field| field.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CollectionError::Parse(format!("{}: {}", label, e)))?;
        if values.len() < 4 {
            return Err(CollectionError::Parse(format!(
                "{}: expected at least 4 counters, found {}",
                label,
                values.len()
            )));
        }

        let (user, nice, system, idle) = (values[0], values[1], values[2], values[3]);
        let irq = values.get(5).copied().unwrap_or(0);
        cores.push(TickSnapshot::new(idle, user + nice + system + idle + irq));
    }

    Ok(cores)
}

/// Per-core usage between two snapshots.
///
/// Without a usable previous snapshot (first call, or the core count changed)
/// every core reports 0.
pub fn core_usages(previous: Option<&[TickSnapshot]>, current: &[TickSnapshot]) -> Vec<f64> {
    match previous {
        Some(previous) if previous.len() == current.len() => previous
            .iter()
            .zip(current)
            .map(|(prev, now)| {
                let total_delta = now.total as f64 - prev.total as f64;
                let idle_delta = now.idle as f64 - prev.idle as f64;
                if total_delta <= 0.0 {
                    return 0.0;
                }
                let usage = (total_delta - idle_delta) / total_delta * 100.0;
                round_tenth(usage.clamp(0.0, 100.0))
            })
            .collect(),
        _ => vec![0.0; current.len()],
    }
}

pub fn overall_usage(cores: &[f64]) -> f64 {
    if cores.is_empty() {
        return 0.0;
    }
    round_tenth(cores.iter().sum::<f64>() / cores.len() as f64)
}

/// Tick-delta CPU sampler. Holds the previous snapshot between calls.
pub struct CpuCollector<S: TickSource = HostTickSource> {
    source: S,
    previous: Option<Vec<TickSnapshot>>,
}

impl CpuCollector<HostTickSource> {
    pub fn new() -> Self {
        Self::with_source(HostTickSource::new())
    }
}

impl<S: TickSource> CpuCollector<S> {
    pub fn with_source(source: S) -> Self {
        Self { source, previous: None }
    }

    pub fn sample(&mut self) -> Result<CpuMetrics, CollectionError> {
        let reading = self.source.read()?;
        let cores = core_usages(self.previous.as_deref(), &reading.cores);
        let overall = overall_usage(&cores);

        self.previous = Some(reading.cores);

        debug!("Sampled {} cores, overall {:.1}%", cores.len(), overall);
        Ok(CpuMetrics {
            overall,
            cores,
            model: reading.model.unwrap_or_else(|| String::from("Unknown")),
            speed_mhz: reading.speed_mhz.unwrap_or(0),
        })
    }

    fn internal_validate(&self) -> Result<(), CollectionError> {
        if self.source.core_count() > 0 {
            Ok(())
        } else {
            Err(CollectionError::SystemApi("No CPU information available".to_string()))
        }
    }
}

impl<S: TickSource> DataCollector<CpuMetrics> for CpuCollector<S> {
    fn collect(&mut self) -> Result<CpuMetrics, CollectionError> {
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
impl<S: TickSource + Send + Sync> AsyncDataCollector<CpuMetrics> for CpuCollector<S> {
    async fn collect(&mut self) -> Result<CpuMetrics, CollectionError> {
        DataCollector::collect(self)
    }

    async fn validate(&self) -> Result<(), CollectionError> {
        self.internal_validate()
    }

    async fn health_check(&self) -> bool {
        self.internal_validate().is_ok()
    }
}

impl Default for CpuCollector<HostTickSource> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedTicks {
        readings: VecDeque<Vec<TickSnapshot>>,
    }

    impl ScriptedTicks {
        fn new(readings: Vec<Vec<TickSnapshot>>) -> Self {
            Self { readings: readings.into() }
        }
    }

    impl TickSource for ScriptedTicks {
        fn read(&mut self) -> Result<TickReading, CollectionError> {
            let cores = self
                .readings
                .pop_front()
                .ok_or_else(|| CollectionError::SystemApi("script exhausted".to_string()))?;
            Ok(TickReading { cores, model: None, speed_mhz: None })
        }

        fn core_count(&self) -> usize {
            self.readings.front().map(Vec::len).unwrap_or(0)
        }
    }

    // user=200, idle=800
    fn before() -> TickSnapshot {
        TickSnapshot::new(800, 1000)
    }

    // user=700, idle=1300
    fn after() -> TickSnapshot {
        TickSnapshot::new(1300, 2000)
    }

    #[test]
    fn first_sample_reports_zero_for_every_core() {
        for count in [0usize, 1, 4, 16] {
            let mut collector = CpuCollector::with_source(ScriptedTicks::new(vec![vec![before(); count]]));
            let metrics = collector.sample().unwrap();
            assert_eq!(metrics.cores, vec![0.0; count]);
            assert_eq!(metrics.overall, 0.0);
        }
    }

    #[test]
    fn delta_between_samples_gives_usage() {
        let mut collector = CpuCollector::with_source(ScriptedTicks::new(vec![vec![before()], vec![after()]]));
        collector.sample().unwrap();
        let metrics = collector.sample().unwrap();
        assert_eq!(metrics.cores, vec![50.0]);
        assert_eq!(metrics.overall, 50.0);
    }

    #[test]
    fn unchanged_counters_report_zero() {
        let mut collector = CpuCollector::with_source(ScriptedTicks::new(vec![vec![after()], vec![after()]]));
        collector.sample().unwrap();
        let metrics = collector.sample().unwrap();
        assert_eq!(metrics.cores, vec![0.0]);
        assert_eq!(metrics.overall, 0.0);
    }

    #[test]
    fn overall_is_mean_of_cores() {
        let prev = vec![TickSnapshot::new(0, 0), TickSnapshot::new(100, 100)];
        let now = vec![TickSnapshot::new(90, 100), TickSnapshot::new(280, 300)];
        let cores = core_usages(Some(&prev), &now);
        assert_eq!(cores, vec![10.0, 10.0]);
        assert_eq!(overall_usage(&cores), 10.0);

        assert_eq!(overall_usage(&[10.0, 20.0, 25.0]), 18.3);
        assert_eq!(overall_usage(&[]), 0.0);
    }

    #[test]
    fn core_count_change_resets_to_zero() {
        let mut collector = CpuCollector::with_source(ScriptedTicks::new(vec![
            vec![before()],
            vec![after(), after()],
            vec![TickSnapshot::new(1800, 3000), TickSnapshot::new(1300, 3000)],
        ]));
        collector.sample().unwrap();
        assert_eq!(collector.sample().unwrap().cores, vec![0.0, 0.0]);
        // the mismatched reading still becomes the new baseline
        assert_eq!(collector.sample().unwrap().cores, vec![50.0, 100.0]);
    }

    #[test]
    fn counters_going_backwards_report_zero() {
        let cores = core_usages(Some(&[after()]), &[before()]);
        assert_eq!(cores, vec![0.0]);
    }

    #[test]
    fn usage_is_rounded_to_one_decimal() {
        let cores = core_usages(Some(&[TickSnapshot::new(0, 0)]), &[TickSnapshot::new(2, 3)]);
        assert_eq!(cores, vec![33.3]);
    }

    #[test]
    fn unknown_model_and_speed_default() {
        let mut collector = CpuCollector::with_source(ScriptedTicks::new(vec![vec![before()]]));
        let metrics = collector.sample().unwrap();
        assert_eq!(metrics.model, "Unknown");
        assert_eq!(metrics.speed_mhz, 0);
    }

    #[test]
    fn source_failure_propagates() {
        let mut collector = CpuCollector::with_source(ScriptedTicks::new(vec![]));
        assert!(matches!(collector.sample(), Err(CollectionError::SystemApi(_))));
        assert!(!DataCollector::health_check(&collector));
    }

    #[test]
    fn parses_proc_stat_core_lines() {
        let stat = "\
cpu  1000 50 300 8000 20 10 5 0 0 0
cpu0 200 0 100 800 10 7 3 0 0 0
cpu1 300 10 50 900 5 3 2 0 0 0
intr 12345 0 0
ctxt 999
";
        let cores = parse_proc_stat(stat).unwrap();
        assert_eq!(cores, vec![TickSnapshot::new(800, 1107), TickSnapshot::new(900, 1263)]);
    }

    #[test]
    fn malformed_proc_stat_is_a_parse_error() {
        assert!(matches!(parse_proc_stat("cpu0 1 2 x 4"), Err(CollectionError::Parse(_))));
        assert!(matches!(parse_proc_stat("cpu0 1 2"), Err(CollectionError::Parse(_))));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn host_source_reads_real_counters() {
        let mut source = HostTickSource::new();
        let reading = source.read().unwrap();
        assert!(!reading.cores.is_empty());
        assert!(reading.cores.iter().all(|core| core.idle <= core.total));
    }

    #[tokio::test]
    async fn async_collect_runs_the_same_engine() {
        let mut collector = CpuCollector::with_source(ScriptedTicks::new(vec![vec![before()], vec![after()]]));
        assert!(AsyncDataCollector::health_check(&collector).await);

        AsyncDataCollector::collect(&mut collector).await.unwrap();
        let metrics = AsyncDataCollector::collect(&mut collector).await.unwrap();
        assert_eq!(metrics.overall, 50.0);
        assert!(AsyncDataCollector::validate(&collector).await.is_err());
    }
}
