//! Error types for the signal watcher.

use thiserror::Error;

use crate::types::Timeframe;

/// Top-level watcher error.
///
/// Every variant is local to a single tick: the poll loop reports it and
/// moves on to the next tick.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("State error: {0}")]
    State(#[from] StateError),
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {needed} points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Price history errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("No price data available for the {timeframe} timeframe")]
    Unavailable { timeframe: Timeframe },

    #[error("Provider error{}: {message}", http_status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Provider {
        http_status: Option<u16>,
        message: String,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Transport-level failure with no HTTP status.
    pub fn transport(message: impl Into<String>) -> Self {
        DataError::Provider {
            http_status: None,
            message: message.into(),
        }
    }
}

/// Notification delivery errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Notifier misconfigured: {0}")]
    Configuration(String),
}

/// Persisted state errors.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for watcher operations.
pub type WatchResult<T> = Result<T, WatchError>;
