//! Persisted signal status command implementation.

use anyhow::{Context, Result};
use sigwatch_config::AppConfig;

use crate::cli::SymbolArgs;

pub async fn run(args: SymbolArgs, config: AppConfig) -> Result<()> {
    let config = super::prepare(config, args.symbol)?;
    let store = super::build_store(&config);
    let symbol = &config.watch.symbol;

    let state = store
        .load(symbol)
        .await
        .with_context(|| format!("failed to read signal state for {}", symbol))?;

    println!("Symbol: {}", symbol);
    println!("Signal: {}", state.signal);
    match state.updated_at {
        Some(at) => println!("Updated: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("Updated: never"),
    }
    println!("State dir: {}", config.state.dir.display());

    Ok(())
}
