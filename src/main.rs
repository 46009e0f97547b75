use env_logger::Env;
use resource_lens::{
    features::{
        display::{StatusLine, WidgetUpdate},
        monitor::ResourceMonitor,
    },
    shared::config::{MonitorConfig, OutputFormat},
};
use log::{debug, error, info, warn};
use tokio::time::{self, MissedTickBehavior};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1);
    let config = match MonitorConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };

    let interval_period = config.update_interval();
    let output = config.output;
    let mut monitor = ResourceMonitor::new(config);

    if monitor.start().await {
        info!("GPU detected, VRAM will be reported");
    } else if monitor.config().show_gpu {
        warn!("No supported GPU diagnostic tool responded, VRAM will be reported as unavailable");
    }

    info!("Polling every {} ms", interval_period.as_millis());

    let mut status = StatusLine::new();
    // Delay keeps ticks from bunching up after a slow GPU query.
    let mut interval = time::interval(interval_period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }

        let snapshot = match monitor.tick().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Error collecting resource metrics: {}", e);
                break;
            }
        };

        match output {
            OutputFormat::Json => match serde_json::to_string(&snapshot) {
                Ok(line) => println!("{}", line),
                Err(e) => error!("Failed to serialize snapshot: {}", e),
            },
            OutputFormat::Text => {
                let updates = status.render(&snapshot, monitor.config());
                let changed = updates
                    .iter()
                    .any(|(_, update)| matches!(update, WidgetUpdate::Changed { .. }));
                for (widget, update) in &updates {
                    if let WidgetUpdate::Changed { tooltip: Some(tooltip), .. } = update {
                        debug!("{} details:\n{}", widget.label(), tooltip);
                    }
                }
                if changed {
                    info!("{}", status.summary());
                }
            }
        }
    }
}
