//! Indicator series aligned to a price series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Indicator values at one price timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub timestamp: DateTime<Utc>,
    /// RSI in [0, 100], `None` during warm-up or on a flat window
    pub rsi: Option<f64>,
    /// Stochastic RSI in [0, 1], `None` until its trailing window fills
    pub stoch_rsi: Option<f64>,
}

/// Indicator values index-aligned to their source price series.
///
/// The first `warmup` points carry no values; consumers should read through
/// [`IndicatorSeries::latest_rsi`] and friends rather than indexing blindly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSeries {
    points: Vec<IndicatorPoint>,
    warmup: usize,
}

impl IndicatorSeries {
    /// Create a series from aligned points and the warm-up length.
    pub fn new(points: Vec<IndicatorPoint>, warmup: usize) -> Self {
        Self { points, warmup }
    }

    /// Number of points, equal to the source series length.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Leading span with no defined values.
    pub fn warmup(&self) -> usize {
        self.warmup
    }

    pub fn points(&self) -> &[IndicatorPoint] {
        &self.points
    }

    /// Points past the warm-up span.
    pub fn seated(&self) -> &[IndicatorPoint] {
        &self.points[self.warmup.min(self.points.len())..]
    }

    /// Defined RSI values, oldest first.
    pub fn rsi_values(&self) -> Vec<f64> {
        self.points.iter().filter_map(|p| p.rsi).collect()
    }

    /// Defined stochastic RSI values, oldest first.
    pub fn stoch_rsi_values(&self) -> Vec<f64> {
        self.points.iter().filter_map(|p| p.stoch_rsi).collect()
    }

    /// RSI at the most recent point, if defined there.
    pub fn latest_rsi(&self) -> Option<f64> {
        self.points.last().and_then(|p| p.rsi)
    }

    /// Stochastic RSI at the most recent point, if defined there.
    pub fn latest_stoch_rsi(&self) -> Option<f64> {
        self.points.last().and_then(|p| p.stoch_rsi)
    }
}
