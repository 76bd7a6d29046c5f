//! Validate configuration command.

use anyhow::Result;
use sigwatch_config::{AppConfig, ConfigError};
use std::path::Path;

pub async fn run(config_path: &Path, loaded: Result<AppConfig, ConfigError>) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Symbol: {}", config.watch.symbol);
    println!(
        "Timeframes: {}",
        config
            .watch
            .timeframes
            .iter()
            .map(|tf| tf.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Poll interval: {}s", config.watch.poll_interval_secs);
    println!("Indicator: {}", config.watch.indicator);
    println!(
        "Thresholds: oversold {} / midline {} / overbought {}",
        config.thresholds.oversold, config.thresholds.midline, config.thresholds.overbought
    );
    println!("Provider: {:?}", config.provider.kind);
    println!("Notifier: {:?}", config.notifier.kind);
    println!("State dir: {}", config.state.dir.display());

    Ok(())
}
