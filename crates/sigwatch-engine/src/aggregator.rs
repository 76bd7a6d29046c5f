//! Per-timeframe fetch and reduction.

use chrono::{DateTime, Utc};
use sigwatch_core::error::{DataError, IndicatorError, WatchResult};
use sigwatch_core::traits::PriceHistoryProvider;
use sigwatch_core::types::{PriceSeries, Timeframe, TimeframeSnapshot};
use sigwatch_indicators::compute_stoch_rsi;
use std::sync::Arc;
use tracing::debug;

use crate::lookback::LookbackPolicy;

/// Reduce a fetched series to the readings the evaluator needs.
///
/// The reference price is the point closest to one timeframe-length before
/// `now`, ignoring the series' own last point; ties go to the earlier point.
/// The latest price is the series' last point until [`align_latest`] replaces
/// it with the tick-wide one.
pub fn build_snapshot(
    series: &PriceSeries,
    rsi_period: usize,
    stoch_period: usize,
    now: DateTime<Utc>,
) -> WatchResult<TimeframeSnapshot> {
    let timeframe = series.timeframe;
    let latest = series
        .last()
        .ok_or(DataError::Unavailable { timeframe })?;
    if series.len() < rsi_period {
        return Err(IndicatorError::InsufficientData {
            needed: rsi_period,
            got: series.len(),
        }
        .into());
    }

    let indicators = compute_stoch_rsi(series, rsi_period, stoch_period)?;
    let reference = series
        .closest_before_last(now - timeframe.duration())
        .ok_or(IndicatorError::InsufficientData {
            needed: 2,
            got: series.len(),
        })?;

    Ok(TimeframeSnapshot {
        timeframe,
        latest_rsi: indicators.latest_rsi(),
        latest_stoch_rsi: indicators.latest_stoch_rsi(),
        latest_price: latest.price,
        latest_at: latest.timestamp,
        reference_price: reference.price,
        reference_at: reference.timestamp,
        bars: series.len(),
    })
}

/// Give every snapshot of a tick the same current price.
///
/// The most recent point across all timeframes wins; on equal timestamps the
/// finer timeframe wins.
pub fn align_latest(snapshots: &mut [TimeframeSnapshot]) {
    let Some((price, at)) = snapshots
        .iter()
        .max_by(|a, b| {
            a.latest_at
                .cmp(&b.latest_at)
                .then_with(|| b.timeframe.cmp(&a.timeframe))
        })
        .map(|s| (s.latest_price, s.latest_at))
    else {
        return;
    };

    for snap in snapshots.iter_mut() {
        snap.latest_price = price;
        snap.latest_at = at;
    }
}

/// Fetches each configured timeframe and builds its snapshot.
pub struct TimeframeAggregator {
    provider: Arc<dyn PriceHistoryProvider>,
    lookback: LookbackPolicy,
    rsi_period: usize,
    stoch_period: usize,
}

impl TimeframeAggregator {
    pub fn new(
        provider: Arc<dyn PriceHistoryProvider>,
        lookback: LookbackPolicy,
        rsi_period: usize,
        stoch_period: usize,
    ) -> Self {
        Self {
            provider,
            lookback,
            rsi_period,
            stoch_period,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Snapshot of a single timeframe at `now`.
    pub async fn snapshot(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> WatchResult<TimeframeSnapshot> {
        let lookback = self.lookback.lookback_minutes(timeframe);
        let series = self
            .provider
            .fetch(symbol, timeframe.minutes(), lookback, now)
            .await?;

        debug!(
            symbol,
            timeframe = %timeframe,
            lookback_minutes = lookback,
            points = series.len(),
            "fetched price history"
        );

        build_snapshot(&series, self.rsi_period, self.stoch_period, now)
    }

    /// Snapshots for every timeframe, in order, sharing the tick's latest
    /// price.
    ///
    /// Timeframes are fetched one after another; the first failure aborts
    /// the whole collection.
    pub async fn collect(
        &self,
        symbol: &str,
        timeframes: &[Timeframe],
        now: DateTime<Utc>,
    ) -> WatchResult<Vec<TimeframeSnapshot>> {
        let mut snapshots = Vec::with_capacity(timeframes.len());
        for &timeframe in timeframes {
            let snapshot = self.snapshot(symbol, timeframe, now).await.map_err(|e| {
                debug!(symbol, timeframe = %timeframe, error = %e, "timeframe failed");
                e
            })?;
            snapshots.push(snapshot);
        }
        align_latest(&mut snapshots);
        Ok(snapshots)
    }
}

impl std::fmt::Debug for TimeframeAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeframeAggregator")
            .field("provider", &self.provider.name())
            .field("lookback", &self.lookback)
            .field("rsi_period", &self.rsi_period)
            .field("stoch_period", &self.stoch_period)
            .finish()
    }
}
