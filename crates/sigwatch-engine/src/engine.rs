//! The per-tick pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sigwatch_core::error::{StateError, WatchError, WatchResult};
use sigwatch_core::traits::{Notifier, PriceHistoryProvider, StateStore};
use sigwatch_core::types::{SignalState, Timeframe, TimeframeSnapshot};
use sigwatch_indicators::{DEFAULT_RSI_PERIOD, DEFAULT_STOCH_PERIOD};
use sigwatch_signals::{EvaluatorConfig, GateOutcome, SignalEvaluator, SignalGate};
use std::sync::Arc;
use tracing::{debug, info};

use crate::aggregator::TimeframeAggregator;
use crate::lookback::LookbackPolicy;

/// What the engine watches and how it reads it.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub symbol: String,
    /// Evaluated together; fetched in this order
    pub timeframes: Vec<Timeframe>,
    pub rsi_period: usize,
    pub stoch_period: usize,
    pub lookback: LookbackPolicy,
    pub evaluator: EvaluatorConfig,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            symbol: "BTC".to_string(),
            timeframes: Timeframe::defaults(),
            rsi_period: DEFAULT_RSI_PERIOD,
            stoch_period: DEFAULT_STOCH_PERIOD,
            lookback: LookbackPolicy::default(),
            evaluator: EvaluatorConfig::default(),
        }
    }
}

impl WatchConfig {
    pub fn validate(&self) -> WatchResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(WatchError::Config("symbol must not be empty".into()));
        }
        if self.timeframes.is_empty() {
            return Err(WatchError::Config("at least one timeframe is required".into()));
        }
        if self.rsi_period < 2 || self.stoch_period < 2 {
            return Err(WatchError::Config(format!(
                "rsi_period ({}) and stoch_period ({}) must be at least 2",
                self.rsi_period, self.stoch_period
            )));
        }
        self.evaluator.validate()
    }
}

/// Result of one successful tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub symbol: String,
    pub at: DateTime<Utc>,
    pub previous: SignalState,
    pub evaluated: SignalState,
    pub snapshots: Vec<TimeframeSnapshot>,
    pub outcome: GateOutcome,
}

/// Runs the fetch, evaluate and gate pipeline for one symbol.
pub struct WatchEngine {
    config: WatchConfig,
    aggregator: TimeframeAggregator,
    evaluator: SignalEvaluator,
    gate: SignalGate,
}

impl WatchEngine {
    pub fn new(
        config: WatchConfig,
        provider: Arc<dyn PriceHistoryProvider>,
        store: Arc<dyn StateStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let aggregator = TimeframeAggregator::new(
            provider,
            config.lookback,
            config.rsi_period,
            config.stoch_period,
        );
        let evaluator = SignalEvaluator::new(config.evaluator);
        let gate = SignalGate::new(store, notifier);

        Self {
            config,
            aggregator,
            evaluator,
            gate,
        }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    /// Persisted signal for the watched symbol.
    pub async fn current_signal(&self) -> Result<SignalState, StateError> {
        self.gate.current(&self.config.symbol).await
    }

    /// Run one tick against the current wall clock.
    pub async fn run_tick(&self) -> WatchResult<TickReport> {
        self.run_tick_at(Utc::now()).await
    }

    /// Run one tick as if the time were `now`.
    ///
    /// Any fetch or indicator failure aborts the tick before evaluation, so
    /// the persisted signal is left untouched and nothing is sent.
    pub async fn run_tick_at(&self, now: DateTime<Utc>) -> WatchResult<TickReport> {
        let symbol = self.config.symbol.as_str();
        let previous = self.gate.current(symbol).await?;

        let snapshots = self
            .aggregator
            .collect(symbol, &self.config.timeframes, now)
            .await?;

        let evaluated = self.evaluator.evaluate(&snapshots, previous);
        debug!(
            symbol,
            previous = %previous,
            evaluated = %evaluated,
            "evaluated signal"
        );

        let outcome = self
            .gate
            .apply(symbol, previous, evaluated, &snapshots, now)
            .await?;

        if outcome.is_change() {
            info!(symbol, from = %previous, to = %evaluated, "tick changed signal");
        }

        Ok(TickReport {
            symbol: symbol.to_string(),
            at: now,
            previous,
            evaluated,
            snapshots,
            outcome,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;
    use sigwatch_core::error::{DataError, NotifyError};
    use sigwatch_core::types::{PricePoint, PriceSeries};
    use sigwatch_data::MemoryStateStore;
    use std::sync::Mutex;

    /// Generates a price for bar `i`, oldest first.
    pub(crate) type Pattern = fn(usize) -> f64;

    pub(crate) fn falling(i: usize) -> f64 {
        1000.0 - i as f64
    }

    /// Up 1.2, down 1.0, repeating: RSI settles in the low-to-mid 50s.
    pub(crate) fn choppy_up(i: usize) -> f64 {
        1000.0 + 0.1 * i as f64 + if i % 2 == 1 { 1.1 } else { 0.0 }
    }

    /// Serves one pattern per tick from a queue; the last pattern repeats.
    pub(crate) struct SyntheticProvider {
        patterns: Mutex<Vec<Pattern>>,
        empty_minutes: Option<u32>,
        /// Interval whose series ends this many minutes before the tick
        lag: Option<(u32, i64)>,
        pub(crate) fetches: Mutex<Vec<u32>>,
    }

    impl SyntheticProvider {
        pub(crate) fn new(patterns: Vec<Pattern>) -> Self {
            Self {
                patterns: Mutex::new(patterns),
                empty_minutes: None,
                lag: None,
                fetches: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn with_empty(mut self, minutes: u32) -> Self {
            self.empty_minutes = Some(minutes);
            self
        }

        pub(crate) fn with_lag(mut self, minutes: u32, lag_minutes: i64) -> Self {
            self.lag = Some((minutes, lag_minutes));
            self
        }

        /// Move to the next pattern in the queue.
        pub(crate) fn advance(&self) {
            let mut patterns = self.patterns.lock().unwrap();
            if patterns.len() > 1 {
                patterns.remove(0);
            }
        }
    }

    #[async_trait]
    impl PriceHistoryProvider for SyntheticProvider {
        async fn fetch(
            &self,
            symbol: &str,
            interval_minutes: u32,
            lookback_minutes: u32,
            end: DateTime<Utc>,
        ) -> Result<PriceSeries, DataError> {
            self.fetches.lock().unwrap().push(interval_minutes);
            let tf = Timeframe::from_minutes(interval_minutes);
            if self.empty_minutes == Some(interval_minutes) {
                return Ok(PriceSeries::empty(symbol, tf));
            }

            let end = match self.lag {
                Some((minutes, lag)) if minutes == interval_minutes => end - Duration::minutes(lag),
                _ => end,
            };
            let pattern = self.patterns.lock().unwrap()[0];
            let bars = (lookback_minutes / interval_minutes) as usize;
            let points = (0..=bars)
                .map(|i| {
                    let at = end - Duration::minutes(i64::from(interval_minutes) * (bars - i) as i64);
                    PricePoint::new(at, Decimal::try_from(pattern(i)).unwrap())
                })
                .collect();
            Ok(PriceSeries::new(symbol, tf, points))
        }

        fn name(&self) -> &str {
            "synthetic"
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub(crate) subjects: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, subject: &str, _body: &str) -> Result<(), NotifyError> {
            self.subjects.lock().unwrap().push(subject.to_string());
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    pub(crate) struct Harness {
        pub(crate) provider: Arc<SyntheticProvider>,
        pub(crate) store: Arc<MemoryStateStore>,
        pub(crate) notifier: Arc<RecordingNotifier>,
        pub(crate) engine: WatchEngine,
    }

    pub(crate) fn harness(provider: SyntheticProvider) -> Harness {
        let provider = Arc::new(provider);
        let store = Arc::new(MemoryStateStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let engine = WatchEngine::new(
            WatchConfig::default(),
            provider.clone(),
            store.clone(),
            notifier.clone(),
        );
        Harness {
            provider,
            store,
            notifier,
            engine,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_oversold_and_falling_triggers_buy() {
        let h = harness(SyntheticProvider::new(vec![falling]));

        let report = h.engine.run_tick_at(now()).await.unwrap();

        assert_eq!(report.previous, SignalState::None);
        assert_eq!(report.evaluated, SignalState::Buy);
        assert_eq!(report.snapshots.len(), 3);
        assert_eq!(
            report.outcome,
            GateOutcome::Transitioned {
                from: SignalState::None,
                to: SignalState::Buy,
                notified: true
            }
        );
        assert_eq!(*h.notifier.subjects.lock().unwrap(), vec!["BTC BUY Signal"]);
        assert_eq!(h.engine.current_signal().await.unwrap(), SignalState::Buy);
        // Timeframes fetched in configured order
        assert_eq!(*h.provider.fetches.lock().unwrap(), vec![5, 15, 30]);
    }

    #[tokio::test]
    async fn test_lagging_slow_timeframe_still_triggers_buy() {
        // Last 30m bar is 20 minutes old at tick time
        let h = harness(SyntheticProvider::new(vec![falling]).with_lag(30, 20));

        let report = h.engine.run_tick_at(now()).await.unwrap();

        assert_eq!(report.evaluated, SignalState::Buy);
        let slow = &report.snapshots[2];
        assert_eq!(slow.timeframe, Timeframe::from_minutes(30));
        assert_eq!(slow.reference_at, now() - Duration::minutes(50));
        assert!(slow.is_falling());
        // Every timeframe compares against the 5m close at the tick
        for snap in &report.snapshots {
            assert_eq!(snap.latest_at, now());
            assert_eq!(snap.latest_price, report.snapshots[0].latest_price);
        }
        assert_eq!(*h.notifier.subjects.lock().unwrap(), vec!["BTC BUY Signal"]);
    }

    #[tokio::test]
    async fn test_mid_band_moves_buy_to_hold_to_sell() {
        let h = harness(SyntheticProvider::new(vec![falling, choppy_up]));

        h.engine.run_tick_at(now()).await.unwrap();
        h.provider.advance();
        let report = h.engine.run_tick_at(now() + Duration::minutes(1)).await.unwrap();

        for snap in &report.snapshots {
            let rsi = snap.latest_rsi.unwrap();
            assert!(rsi > 50.0 && rsi < 65.0, "{} rsi {}", snap.timeframe, rsi);
        }
        assert_eq!(report.previous, SignalState::Buy);
        assert_eq!(report.evaluated, SignalState::HoldToSell);
        assert_eq!(
            *h.notifier.subjects.lock().unwrap(),
            vec!["BTC BUY Signal", "BTC HOLD TO SELL Signal"]
        );
    }

    #[tokio::test]
    async fn test_repeated_ticks_notify_once() {
        let h = harness(SyntheticProvider::new(vec![falling]));

        for i in 0..5 {
            h.engine
                .run_tick_at(now() + Duration::minutes(i))
                .await
                .unwrap();
        }

        assert_eq!(h.notifier.subjects.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_timeframe_aborts_tick() {
        let h = harness(SyntheticProvider::new(vec![falling]).with_empty(15));

        let err = h.engine.run_tick_at(now()).await.unwrap_err();

        assert!(matches!(
            err,
            WatchError::Data(DataError::Unavailable { timeframe }) if timeframe.minutes() == 15
        ));
        // 30m never fetched after the failure
        assert_eq!(*h.provider.fetches.lock().unwrap(), vec![5, 15]);
        assert!(h.notifier.subjects.lock().unwrap().is_empty());
        assert!(h.store.is_empty());
        assert_eq!(h.engine.current_signal().await.unwrap(), SignalState::None);
    }

    #[test]
    fn test_watch_config_validation() {
        assert!(WatchConfig::default().validate().is_ok());

        let no_timeframes = WatchConfig {
            timeframes: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(no_timeframes.validate(), Err(WatchError::Config(_))));

        let tiny_period = WatchConfig {
            rsi_period: 1,
            ..Default::default()
        };
        assert!(tiny_period.validate().is_err());
    }
}
