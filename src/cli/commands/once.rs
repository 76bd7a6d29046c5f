//! Single tick command implementation.

use anyhow::Result;
use sigwatch_config::AppConfig;
use sigwatch_monitor::report_tick;

use crate::cli::SymbolArgs;

pub async fn run(args: SymbolArgs, config: AppConfig) -> Result<()> {
    let config = super::prepare(config, args.symbol)?;
    let engine = super::build_engine(&config)?;

    let result = engine.run_tick().await;
    report_tick(&result);
    result?;

    Ok(())
}
