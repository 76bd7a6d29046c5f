//! Poll loop command implementation.

use anyhow::Result;
use sigwatch_config::AppConfig;
use sigwatch_engine::run_poll_loop;
use sigwatch_monitor::report_tick;
use tracing::{info, warn};

use crate::cli::RunArgs;

pub async fn run(args: RunArgs, config: AppConfig) -> Result<()> {
    let config = super::prepare(config, args.target.symbol)?;
    let engine = super::build_engine(&config)?;
    let poll = config.poll_config(args.max_ticks);

    println!(
        "Watching {} on {} every {}s (Ctrl-C to stop)",
        engine.symbol(),
        config
            .watch
            .timeframes
            .iter()
            .map(|tf| tf.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        config.watch.poll_interval_secs
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    let ticks = run_poll_loop(&engine, poll, shutdown, report_tick).await;
    info!(ticks, "signal watcher stopped");

    Ok(())
}
