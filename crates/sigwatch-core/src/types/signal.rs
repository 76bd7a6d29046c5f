//! Signal states and their persisted form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The watcher's discrete recommendation.
///
/// Serialized with the human-readable labels used in state files and
/// notification subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignalState {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "buy")]
    Buy,
    #[serde(rename = "sell")]
    Sell,
    #[serde(rename = "hold to sell", alias = "hold_to_sell")]
    HoldToSell,
    #[serde(rename = "wait to buy", alias = "wait_to_buy")]
    WaitToBuy,
}

impl SignalState {
    /// Lowercase label, as stored on disk.
    pub fn label(&self) -> &'static str {
        match self {
            SignalState::None => "none",
            SignalState::Buy => "buy",
            SignalState::Sell => "sell",
            SignalState::HoldToSell => "hold to sell",
            SignalState::WaitToBuy => "wait to buy",
        }
    }

    /// Whether this is the default, no-recommendation state.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, SignalState::None)
    }

    pub fn all() -> &'static [SignalState] {
        &[
            SignalState::None,
            SignalState::Buy,
            SignalState::Sell,
            SignalState::HoldToSell,
            SignalState::WaitToBuy,
        ]
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SignalState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "none" | "" => Ok(SignalState::None),
            "buy" => Ok(SignalState::Buy),
            "sell" => Ok(SignalState::Sell),
            "hold to sell" => Ok(SignalState::HoldToSell),
            "wait to buy" => Ok(SignalState::WaitToBuy),
            other => Err(format!("Invalid signal: {}", other)),
        }
    }
}

/// Durable record of the last accepted signal for a symbol.
///
/// A record without a `signal` key reads as [`SignalState::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub signal: SignalState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PersistedState {
    pub fn new(signal: SignalState, updated_at: DateTime<Utc>) -> Self {
        Self {
            signal,
            updated_at: Some(updated_at),
        }
    }
}
