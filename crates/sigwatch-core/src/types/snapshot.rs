//! Per-timeframe reduction of a tick's price history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Timeframe;

/// Which momentum value the evaluator compares against its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    /// RSI on its native 0-100 scale
    #[default]
    Rsi,
    /// Stochastic RSI scaled by 100
    StochRsi,
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::Rsi => write!(f, "rsi"),
            IndicatorKind::StochRsi => write!(f, "stoch_rsi"),
        }
    }
}

impl FromStr for IndicatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rsi" => Ok(IndicatorKind::Rsi),
            "stoch_rsi" | "stochrsi" | "stoch-rsi" => Ok(IndicatorKind::StochRsi),
            _ => Err(format!("Invalid indicator kind: {}", s)),
        }
    }
}

/// Latest indicator and price readings for one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeSnapshot {
    pub timeframe: Timeframe,
    /// RSI at the latest bar
    pub latest_rsi: Option<f64>,
    /// Stochastic RSI at the latest bar
    pub latest_stoch_rsi: Option<f64>,
    /// Current price for the tick: the most recent point across every
    /// timeframe, so all snapshots of one tick share it
    pub latest_price: Decimal,
    /// Timestamp of the latest price
    pub latest_at: DateTime<Utc>,
    /// Price closest to one timeframe-length before the tick instant,
    /// chosen among this timeframe's points other than its last one
    pub reference_price: Decimal,
    /// Timestamp of the reference price
    pub reference_at: DateTime<Utc>,
    /// Number of bars the readings were computed from
    pub bars: usize,
}

impl TimeframeSnapshot {
    /// The value compared against signal thresholds, on a 0-100 scale.
    pub fn indicator(&self, kind: IndicatorKind) -> Option<f64> {
        match kind {
            IndicatorKind::Rsi => self.latest_rsi,
            IndicatorKind::StochRsi => self.latest_stoch_rsi.map(|v| v * 100.0),
        }
    }

    /// Latest price is strictly below the reference price.
    #[inline]
    pub fn is_falling(&self) -> bool {
        self.latest_price < self.reference_price
    }

    /// Latest price is strictly above the reference price.
    #[inline]
    pub fn is_rising(&self) -> bool {
        self.latest_price > self.reference_price
    }
}
