//! Multi-timeframe signal evaluator.
//!
//! Every configured timeframe must agree for a band to fire:
//! - Buy: indicator below oversold and price falling
//! - Sell: indicator above overbought and price rising
//! - Hold to sell: indicator between midline and overbought
//! - Wait to buy: indicator between oversold and midline
//!
//! Anything else keeps the previous signal.

use serde::{Deserialize, Serialize};
use sigwatch_core::error::WatchError;
use sigwatch_core::types::{IndicatorKind, SignalState, TimeframeSnapshot};

/// Indicator thresholds on a 0-100 scale. All comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    /// Buy below this
    pub oversold: f64,
    /// Splits wait-to-buy from hold-to-sell
    pub midline: f64,
    /// Sell above this
    pub overbought: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            oversold: 35.0,
            midline: 50.0,
            overbought: 65.0,
        }
    }
}

impl SignalThresholds {
    pub fn validate(&self) -> Result<(), WatchError> {
        let all = [self.oversold, self.midline, self.overbought];
        if all.iter().any(|v| !(0.0..=100.0).contains(v)) {
            return Err(WatchError::Config(
                "Signal thresholds must be between 0 and 100".into(),
            ));
        }
        if !(self.oversold < self.midline && self.midline < self.overbought) {
            return Err(WatchError::Config(format!(
                "Thresholds must satisfy oversold < midline < overbought, got {} / {} / {}",
                self.oversold, self.midline, self.overbought
            )));
        }
        Ok(())
    }
}

/// Configuration for the signal evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    #[serde(default)]
    pub thresholds: SignalThresholds,
    /// Value compared against the thresholds
    #[serde(default)]
    pub indicator: IndicatorKind,
}

impl EvaluatorConfig {
    pub fn validate(&self) -> Result<(), WatchError> {
        self.thresholds.validate()
    }
}

/// Folds a tick's snapshots into one signal.
#[derive(Debug, Clone, Default)]
pub struct SignalEvaluator {
    config: EvaluatorConfig,
}

impl SignalEvaluator {
    /// Create a new evaluator.
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Bands in precedence order.
    const PRECEDENCE: [SignalState; 4] = [
        SignalState::Buy,
        SignalState::Sell,
        SignalState::HoldToSell,
        SignalState::WaitToBuy,
    ];

    /// Whether one snapshot satisfies a band's condition.
    fn in_band(&self, band: SignalState, snapshot: &TimeframeSnapshot) -> bool {
        let Some(value) = snapshot.indicator(self.config.indicator) else {
            return false;
        };
        let t = &self.config.thresholds;

        match band {
            SignalState::Buy => value < t.oversold && snapshot.is_falling(),
            SignalState::Sell => value > t.overbought && snapshot.is_rising(),
            SignalState::HoldToSell => t.midline < value && value < t.overbought,
            SignalState::WaitToBuy => t.oversold < value && value < t.midline,
            SignalState::None => false,
        }
    }

    /// Every band that all snapshots agree on, in precedence order.
    ///
    /// Empty when there are no snapshots.
    pub fn matching_bands(&self, snapshots: &[TimeframeSnapshot]) -> Vec<SignalState> {
        if snapshots.is_empty() {
            return Vec::new();
        }
        Self::PRECEDENCE
            .into_iter()
            .filter(|band| snapshots.iter().all(|s| self.in_band(*band, s)))
            .collect()
    }

    /// Evaluate the tick's signal, falling back to `previous` when no band
    /// holds across every timeframe.
    pub fn evaluate(&self, snapshots: &[TimeframeSnapshot], previous: SignalState) -> SignalState {
        self.matching_bands(snapshots)
            .first()
            .copied()
            .unwrap_or(previous)
    }
}
