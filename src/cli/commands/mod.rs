//! CLI command implementations.

pub mod once;
pub mod run;
pub mod status;
pub mod validate;

use anyhow::{Context, Result};
use sigwatch_config::{AppConfig, NotifierKind, ProviderKind};
use sigwatch_core::traits::{Notifier, PriceHistoryProvider, StateStore};
use sigwatch_data::{CoinMarketCapConfig, CoinMarketCapProvider, CsvPriceHistory, JsonStateStore};
use sigwatch_engine::WatchEngine;
use sigwatch_notify::{LogNotifier, WebhookConfig, WebhookNotifier};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Apply a `--symbol` override and check the result.
pub(crate) fn prepare(mut config: AppConfig, symbol: Option<String>) -> Result<AppConfig> {
    if let Some(symbol) = symbol {
        config.watch.symbol = symbol.to_uppercase();
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn build_provider(config: &AppConfig) -> Result<Arc<dyn PriceHistoryProvider>> {
    let settings = &config.provider;
    let provider: Arc<dyn PriceHistoryProvider> = match settings.kind {
        ProviderKind::CoinMarketCap => {
            let cmc = CoinMarketCapConfig::from_env(&settings.api_key_env)
                .with_context(|| format!("set {} to a CoinMarketCap API key", settings.api_key_env))?
                .with_base_url(&settings.base_url)
                .with_convert(&settings.convert)
                .with_timeout(Duration::from_secs(settings.timeout_secs));
            Arc::new(CoinMarketCapProvider::new(cmc)?)
        }
        ProviderKind::Csv => Arc::new(CsvPriceHistory::new(&settings.csv_dir)),
    };
    Ok(provider)
}

fn build_notifier(config: &AppConfig) -> Result<Arc<dyn Notifier>> {
    let settings = &config.notifier;
    let notifier: Arc<dyn Notifier> = match settings.kind {
        NotifierKind::Log => Arc::new(LogNotifier::new()),
        NotifierKind::Webhook => {
            let url = settings
                .webhook_url
                .clone()
                .context("notifier.webhook_url is not set")?;
            let webhook =
                WebhookConfig::new(url).with_timeout(Duration::from_secs(settings.timeout_secs));
            Arc::new(WebhookNotifier::new(webhook)?)
        }
    };
    Ok(notifier)
}

pub(crate) fn build_store(config: &AppConfig) -> Arc<dyn StateStore> {
    Arc::new(JsonStateStore::new(&config.state.dir))
}

/// Wire the configured provider, store and notifier into an engine.
pub(crate) fn build_engine(config: &AppConfig) -> Result<WatchEngine> {
    let provider = build_provider(config)?;
    let notifier = build_notifier(config)?;
    let store = build_store(config);

    info!(
        symbol = %config.watch.symbol,
        provider = provider.name(),
        notifier = notifier.name(),
        state_dir = %config.state.dir.display(),
        "engine configured"
    );

    Ok(WatchEngine::new(config.watch_config(), provider, store, notifier))
}
