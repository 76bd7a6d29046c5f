//! How much history to request per timeframe.

use serde::{Deserialize, Serialize};
use sigwatch_core::types::Timeframe;

/// Lookback window rule shared by every timeframe.
///
/// A timeframe of `T` minutes requests `T × max(min_bars, ⌈min_lookback_minutes / T⌉)`
/// minutes, so short timeframes still cover a minimum wall-clock span and long
/// ones still get enough bars for RSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookbackPolicy {
    pub min_bars: u32,
    pub min_lookback_minutes: u32,
}

impl Default for LookbackPolicy {
    fn default() -> Self {
        Self {
            min_bars: 16,
            min_lookback_minutes: 224,
        }
    }
}

impl LookbackPolicy {
    pub fn new(min_bars: u32, min_lookback_minutes: u32) -> Self {
        Self {
            min_bars,
            min_lookback_minutes,
        }
    }

    /// Number of bars requested for `timeframe`.
    pub fn bars(&self, timeframe: Timeframe) -> u32 {
        self.min_bars
            .max(self.min_lookback_minutes.div_ceil(timeframe.minutes()))
    }

    /// Minutes of history requested for `timeframe`.
    pub fn lookback_minutes(&self, timeframe: Timeframe) -> u32 {
        timeframe.minutes().saturating_mul(self.bars(timeframe))
    }
}
