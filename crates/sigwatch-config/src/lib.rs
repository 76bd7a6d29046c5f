//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, LoggingConfig, NotifierKind, NotifierSettings, ProviderKind,
    ProviderSettings, StateSettings, WatchSettings,
};

pub use config::ConfigError;

use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Load configuration from file and environment.
///
/// The file is optional so the watcher can run on defaults and `SIGWATCH__*`
/// variables alone. Nested keys use `__`, e.g. `SIGWATCH__WATCH__SYMBOL=ETH`;
/// `SIGWATCH__WATCH__TIMEFRAMES` takes a comma-separated list.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("SIGWATCH")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("watch.timeframes")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

/// Parse configuration from a TOML string, without environment overrides.
pub fn parse_config(contents: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(contents)
}
