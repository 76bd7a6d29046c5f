//! Configuration structures.

use serde::{Deserialize, Serialize};
use sigwatch_core::error::WatchError;
use sigwatch_core::types::{IndicatorKind, Timeframe};
use sigwatch_engine::{LookbackPolicy, PollConfig, WatchConfig};
use sigwatch_signals::{EvaluatorConfig, SignalThresholds};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub watch: WatchSettings,
    #[serde(default)]
    pub thresholds: SignalThresholds,
    #[serde(default)]
    pub lookback: LookbackPolicy,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub notifier: NotifierSettings,
    #[serde(default)]
    pub state: StateSettings,
}

impl AppConfig {
    /// Check cross-field constraints the types cannot express.
    pub fn validate(&self) -> Result<(), WatchError> {
        if self.watch.poll_interval_secs == 0 {
            return Err(WatchError::Config(
                "watch.poll_interval_secs must be greater than 0".into(),
            ));
        }
        if self.lookback.min_bars == 0 {
            return Err(WatchError::Config("lookback.min_bars must be greater than 0".into()));
        }
        if self.notifier.kind == NotifierKind::Webhook
            && self
                .notifier
                .webhook_url
                .as_deref()
                .map_or(true, |u| u.trim().is_empty())
        {
            return Err(WatchError::Config(
                "notifier.webhook_url is required when notifier.kind = \"webhook\"".into(),
            ));
        }
        self.watch_config().validate()
    }

    /// Engine settings for the configured symbol.
    pub fn watch_config(&self) -> WatchConfig {
        WatchConfig {
            symbol: self.watch.symbol.clone(),
            timeframes: self.watch.timeframes.clone(),
            rsi_period: self.watch.rsi_period,
            stoch_period: self.watch.stoch_period,
            lookback: self.lookback,
            evaluator: EvaluatorConfig {
                thresholds: self.thresholds,
                indicator: self.watch.indicator,
            },
        }
    }

    pub fn poll_config(&self, max_ticks: Option<u64>) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(self.watch.poll_interval_secs),
            max_ticks,
        }
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "sigwatch".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Daily-rolling log file, in addition to the console
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// What to watch and how often.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    pub symbol: String,
    pub timeframes: Vec<Timeframe>,
    pub poll_interval_secs: u64,
    pub rsi_period: usize,
    pub stoch_period: usize,
    pub indicator: IndicatorKind,
}

impl Default for WatchSettings {
    fn default() -> Self {
        let engine = WatchConfig::default();
        Self {
            symbol: engine.symbol,
            timeframes: engine.timeframes,
            poll_interval_secs: 60,
            rsi_period: engine.rsi_period,
            stoch_period: engine.stoch_period,
            indicator: IndicatorKind::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    #[serde(alias = "cmc")]
    CoinMarketCap,
    Csv,
}

/// Price history source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub convert: String,
    pub timeout_secs: u64,
    /// Directory of `<SYMBOL>_<timeframe>.csv` files for the CSV provider
    pub csv_dir: PathBuf,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            base_url: "https://pro-api.coinmarketcap.com".to_string(),
            api_key_env: "CMC_API_KEY".to_string(),
            convert: "USD".to_string(),
            timeout_secs: 10,
            csv_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    #[default]
    Log,
    Webhook,
}

/// Notification delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierSettings {
    pub kind: NotifierKind,
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            kind: NotifierKind::default(),
            webhook_url: None,
            timeout_secs: 10,
        }
    }
}

/// Where signal state is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    pub dir: PathBuf,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("state"),
        }
    }
}
