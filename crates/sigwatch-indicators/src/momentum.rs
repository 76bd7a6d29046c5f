//! Momentum indicators.

use sigwatch_core::error::IndicatorError;
use sigwatch_core::traits::{Indicator, StreamingIndicator};
use sigwatch_core::types::{IndicatorPoint, IndicatorSeries, PriceSeries};

use crate::ewm::StreamingEwm;

/// RSI from smoothed gain and loss.
///
/// A window with losses but no gains reads 0, gains but no losses reads 100.
/// A window with neither is undefined: there is no trend to measure.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 {
            Some(100.0)
        } else {
            None
        }
    } else {
        Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
    }
}

/// Streaming RSI updated one price at a time.
///
/// Gains and losses are smoothed with Wilder's α = 1/period in the adjusted
/// exponential form, so a value is produced from the `period`-th price change
/// onwards.
#[derive(Debug, Clone)]
pub struct StreamingRsi {
    prev_price: Option<f64>,
    gains: StreamingEwm,
    losses: StreamingEwm,
    current: Option<f64>,
}

impl StreamingRsi {
    /// Create a new streaming RSI.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        let alpha = 1.0 / period as f64;
        Self {
            prev_price: None,
            gains: StreamingEwm::new(alpha, period),
            losses: StreamingEwm::new(alpha, period),
            current: None,
        }
    }
}

impl StreamingIndicator for StreamingRsi {
    fn update(&mut self, price: f64) -> Option<f64> {
        if let Some(prev) = self.prev_price.replace(price) {
            let change = price - prev;
            let gain = self.gains.update(change.max(0.0));
            let loss = self.losses.update((-change).max(0.0));
            self.current = match (gain, loss) {
                (Some(g), Some(l)) => rsi_from_averages(g, l),
                _ => None,
            };
        }
        self.current
    }

    fn current(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.prev_price = None;
        self.gains.reset();
        self.losses.reset();
        self.current = None;
    }

    fn is_ready(&self) -> bool {
        self.gains.is_ready()
    }
}

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// The common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Rsi {
    fn calculate(&self, data: &[f64]) -> Result<Vec<Option<f64>>, IndicatorError> {
        self.validate_data(data)?;
        let mut rsi = StreamingRsi::new(self.period);
        Ok(data.iter().map(|&price| rsi.update(price)).collect())
    }

    fn period(&self) -> usize {
        self.period
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// Stochastic RSI.
///
/// Positions RSI within its own trailing range:
/// `(rsi - min) / (max - min)` over the last `stoch_period` RSI values,
/// reading 0 when the range is empty.
#[derive(Debug, Clone)]
pub struct StochRsi {
    rsi: Rsi,
    stoch_period: usize,
}

impl StochRsi {
    /// Create with custom periods.
    pub fn new(rsi_period: usize, stoch_period: usize) -> Self {
        assert!(stoch_period > 0, "Stochastic period must be greater than 0");
        Self {
            rsi: Rsi::new(rsi_period),
            stoch_period,
        }
    }

    /// Apply the stochastic window to already-computed RSI values.
    pub fn from_rsi(&self, rsi: &[Option<f64>]) -> Vec<Option<f64>> {
        (0..rsi.len())
            .map(|i| {
                if i + 1 < self.stoch_period {
                    return None;
                }
                let window = &rsi[i + 1 - self.stoch_period..=i];
                let mut lowest = f64::INFINITY;
                let mut highest = f64::NEG_INFINITY;
                for value in window {
                    let v = (*value)?;
                    lowest = lowest.min(v);
                    highest = highest.max(v);
                }
                let current = rsi[i]?;
                let range = highest - lowest;
                if range == 0.0 {
                    Some(0.0)
                } else {
                    Some((current - lowest) / range)
                }
            })
            .collect()
    }

    /// Calculate both RSI and stochastic RSI, index-aligned to `data`.
    pub fn calculate_with_rsi(
        &self,
        data: &[f64],
    ) -> Result<(Vec<Option<f64>>, Vec<Option<f64>>), IndicatorError> {
        let rsi = self.rsi.calculate(data)?;
        let stoch = self.from_rsi(&rsi);
        Ok((rsi, stoch))
    }
}

impl Default for StochRsi {
    fn default() -> Self {
        Self::new(crate::DEFAULT_RSI_PERIOD, crate::DEFAULT_STOCH_PERIOD)
    }
}

impl Indicator for StochRsi {
    fn calculate(&self, data: &[f64]) -> Result<Vec<Option<f64>>, IndicatorError> {
        self.calculate_with_rsi(data).map(|(_, stoch)| stoch)
    }

    fn period(&self) -> usize {
        self.rsi.period()
    }

    fn warmup(&self) -> usize {
        self.rsi.warmup() + self.stoch_period - 1
    }

    fn name(&self) -> &str {
        "StochRSI"
    }
}

fn check_period(name: &str, period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} period must be greater than 0",
            name
        )));
    }
    Ok(())
}

/// RSI over a price slice, index-aligned to `prices`.
pub fn rsi_values(prices: &[f64], period: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    check_period("RSI", period)?;
    Rsi::new(period).calculate(prices)
}

/// Stochastic RSI over a price slice, index-aligned to `prices`.
pub fn stoch_rsi_values(
    prices: &[f64],
    rsi_period: usize,
    stoch_period: usize,
) -> Result<Vec<Option<f64>>, IndicatorError> {
    check_period("RSI", rsi_period)?;
    check_period("Stochastic", stoch_period)?;
    StochRsi::new(rsi_period, stoch_period).calculate(prices)
}

/// Compute RSI over a price series.
///
/// Fails with `InsufficientData` when the series is shorter than `period`,
/// and with `InvalidData` when a price is not a finite number.
pub fn compute_rsi(series: &PriceSeries, period: usize) -> Result<IndicatorSeries, IndicatorError> {
    check_period("RSI", period)?;
    let rsi = Rsi::new(period);
    let prices = series.prices_f64()?;
    let values = rsi.calculate(&prices)?;

    let points = series
        .iter()
        .zip(values)
        .map(|(p, rsi)| IndicatorPoint {
            timestamp: p.timestamp,
            rsi,
            stoch_rsi: None,
        })
        .collect();

    Ok(IndicatorSeries::new(points, rsi.warmup()))
}

/// Compute RSI and stochastic RSI over a price series.
///
/// The returned warm-up is that of the stochastic value; RSI is defined
/// `stoch_period - 1` points earlier.
pub fn compute_stoch_rsi(
    series: &PriceSeries,
    rsi_period: usize,
    stoch_period: usize,
) -> Result<IndicatorSeries, IndicatorError> {
    check_period("RSI", rsi_period)?;
    check_period("Stochastic", stoch_period)?;
    let stoch = StochRsi::new(rsi_period, stoch_period);
    let prices = series.prices_f64()?;
    let (rsi, stoch_rsi) = stoch.calculate_with_rsi(&prices)?;

    let points = series
        .iter()
        .zip(rsi.into_iter().zip(stoch_rsi))
        .map(|(p, (rsi, stoch_rsi))| IndicatorPoint {
            timestamp: p.timestamp,
            rsi,
            stoch_rsi,
        })
        .collect();

    Ok(IndicatorSeries::new(points, stoch.warmup()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use sigwatch_core::types::{PricePoint, Timeframe};

    fn wave(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect()
    }

    fn series_from(prices: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                PricePoint::new(
                    start + Duration::minutes(5 * i as i64),
                    Decimal::try_from(p).unwrap(),
                )
            })
            .collect();
        PriceSeries::new("TEST", Timeframe::from_minutes(5), points)
    }

    #[test]
    fn test_rsi_known_values() {
        // α = 0.5: avg gain 1/3 vs avg loss 2/3, then 5/7 vs 2/7
        let result = Rsi::new(2).calculate(&[1.0, 2.0, 1.0, 2.0]).unwrap();

        assert!(result[0].is_none() && result[1].is_none());
        assert!((result[2].unwrap() - 100.0 / 3.0).abs() < 1e-9);
        assert!((result[3].unwrap() - 500.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_basic() {
        let rsi = Rsi::new(14);
        let data = wave(30);
        let result = rsi.calculate(&data).unwrap();

        assert_eq!(result.len(), data.len());
        assert!(result[..14].iter().all(Option::is_none));

        let defined: Vec<f64> = result.iter().flatten().copied().collect();
        assert_eq!(defined.len(), data.len() - rsi.warmup());
        for value in defined {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        let rsi = Rsi::new(5);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let result = rsi.calculate(&data).unwrap();

        for value in result.iter().flatten() {
            assert!((value - 100.0).abs() < 1e-10);
        }
        assert_eq!(result.iter().flatten().count(), 2);
    }

    #[test]
    fn test_rsi_non_negative_changes_saturate() {
        // Rises then a flat stretch: no losses anywhere, so RSI stays at 100
        let mut data: Vec<f64> = (1..=15).map(f64::from).collect();
        data.extend([15.0; 6]);
        let result = Rsi::new(14).calculate(&data).unwrap();

        assert!(result.iter().flatten().all(|v| *v == 100.0));
        assert_eq!(result.iter().flatten().count(), data.len() - 14);
    }

    #[test]
    fn test_rsi_all_losses() {
        let rsi = Rsi::new(5);
        let data = vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let result = rsi.calculate(&data).unwrap();

        assert!(result.last().unwrap().unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_rsi_flat_market_is_undefined() {
        let result = Rsi::new(5).calculate(&[10.0; 12]).unwrap();
        assert!(result.iter().all(Option::is_none));
    }

    #[test]
    fn test_rsi_preconditions() {
        let rsi = Rsi::new(14);
        assert_eq!(
            rsi.calculate(&wave(10)),
            Err(IndicatorError::InsufficientData { needed: 14, got: 10 })
        );

        let mut data = wave(20);
        data[7] = f64::NAN;
        assert!(matches!(
            rsi.calculate(&data),
            Err(IndicatorError::InvalidData(_))
        ));
    }

    #[test]
    fn test_streaming_matches_batch() {
        let data = wave(40);
        let batch = Rsi::new(14).calculate(&data).unwrap();

        let mut streaming = StreamingRsi::new(14);
        for (i, &price) in data.iter().enumerate() {
            assert_eq!(streaming.update(price), batch[i]);
        }
        assert!(streaming.is_ready());

        streaming.reset();
        assert!(!streaming.is_ready());
        assert!(streaming.current().is_none());
    }

    #[test]
    fn test_stoch_rsi_bounds() {
        let stoch = StochRsi::default();
        let data = wave(80);
        let result = stoch.calculate(&data).unwrap();

        assert_eq!(result.len(), data.len());
        assert!(result[..stoch.warmup()].iter().all(Option::is_none));
        let defined: Vec<f64> = result.iter().flatten().copied().collect();
        assert_eq!(defined.len(), data.len() - stoch.warmup());
        for value in defined {
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_stoch_rsi_constant_window_is_zero() {
        // Steady climb keeps RSI pinned at 100, so the range collapses
        let data: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let result = StochRsi::new(14, 14).calculate(&data).unwrap();

        assert_eq!(result.iter().flatten().count(), 40 - 27);
        assert!(result.iter().flatten().all(|v| *v == 0.0));
    }

    #[test]
    fn test_stoch_rsi_from_rsi_gaps() {
        let stoch = StochRsi::new(2, 3);
        let rsi = [None, Some(40.0), Some(60.0), Some(50.0), None, Some(70.0)];
        let result = stoch.from_rsi(&rsi);

        assert_eq!(result[2], None);
        assert!((result[3].unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(result[4], None);
        assert_eq!(result[5], None);
    }

    #[test]
    fn test_compute_rsi_on_series() {
        let series = series_from(&wave(30));
        let indicators = compute_rsi(&series, 14).unwrap();

        assert_eq!(indicators.len(), series.len());
        assert_eq!(indicators.warmup(), 14);
        assert_eq!(indicators.seated().len(), 16);
        assert_eq!(indicators.rsi_values().len(), 16);
        assert_eq!(indicators.points()[0].timestamp, series.points()[0].timestamp);
        assert!(indicators.latest_rsi().is_some());
        assert!(indicators.latest_stoch_rsi().is_none());
    }

    #[test]
    fn test_compute_stoch_rsi_on_series() {
        let series = series_from(&wave(45));
        let indicators = compute_stoch_rsi(&series, 14, 14).unwrap();

        assert_eq!(indicators.warmup(), 27);
        assert_eq!(indicators.rsi_values().len(), 31);
        assert_eq!(indicators.stoch_rsi_values().len(), 18);
        assert!(indicators.latest_stoch_rsi().is_some());
    }

    #[test]
    fn test_compute_rejects_bad_input() {
        let short = series_from(&wave(5));
        assert_eq!(
            compute_rsi(&short, 14),
            Err(IndicatorError::InsufficientData { needed: 14, got: 5 })
        );
        assert!(matches!(
            compute_stoch_rsi(&short, 14, 0),
            Err(IndicatorError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_slice_helpers_match_indicators() {
        let prices = wave(40);
        assert_eq!(
            rsi_values(&prices, 14).unwrap(),
            Rsi::new(14).calculate(&prices).unwrap()
        );
        assert_eq!(
            stoch_rsi_values(&prices, 14, 14).unwrap(),
            StochRsi::default().calculate(&prices).unwrap()
        );
        assert!(matches!(
            rsi_values(&prices, 0),
            Err(IndicatorError::InvalidParameter(_))
        ));
    }
}
