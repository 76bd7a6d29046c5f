//! Fixed-period tick scheduling.

use sigwatch_core::error::WatchResult;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::engine::{TickReport, WatchEngine};

/// Poll loop settings.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    /// Stop after this many ticks; run until shutdown when unset
    pub max_ticks: Option<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_ticks: None,
        }
    }
}

/// Run ticks on a fixed period until `shutdown` resolves or `max_ticks` is
/// reached. Returns the number of ticks run.
///
/// The first tick runs immediately. A tick that overruns the period delays
/// the next one rather than queueing a burst. A failed tick is logged and
/// passed to `on_tick` like a successful one; the loop keeps going.
pub async fn run_poll_loop<S, F>(
    engine: &WatchEngine,
    config: PollConfig,
    shutdown: S,
    mut on_tick: F,
) -> u64
where
    S: Future<Output = ()>,
    F: FnMut(&WatchResult<TickReport>),
{
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    info!(
        symbol = engine.symbol(),
        interval_secs = config.interval.as_secs_f64(),
        max_ticks = ?config.max_ticks,
        "signal watcher started"
    );

    let mut ticks = 0u64;
    loop {
        if config.max_ticks.is_some_and(|max| ticks >= max) {
            info!(ticks, "tick limit reached");
            break;
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!(ticks, "signal watcher shutting down");
                break;
            }
            _ = ticker.tick() => {
                let result = engine.run_tick().await;
                if let Err(e) = &result {
                    warn!(symbol = engine.symbol(), error = %e, "tick failed");
                }
                on_tick(&result);
                ticks += 1;
            }
        }
    }

    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::{falling, harness, SyntheticProvider};
    use sigwatch_core::types::SignalState;

    fn fast(max_ticks: Option<u64>) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(1),
            max_ticks,
        }
    }

    #[tokio::test]
    async fn test_stops_after_max_ticks() {
        let h = harness(SyntheticProvider::new(vec![falling]));
        let mut seen = Vec::new();

        let ticks = run_poll_loop(&h.engine, fast(Some(3)), std::future::pending(), |r| {
            seen.push(r.as_ref().map(|report| report.evaluated).ok());
        })
        .await;

        assert_eq!(ticks, 3);
        assert_eq!(seen, vec![Some(SignalState::Buy); 3]);
        assert_eq!(h.notifier.subjects.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_ticks_do_not_stop_loop() {
        let h = harness(SyntheticProvider::new(vec![falling]).with_empty(30));
        let mut failures = 0;

        let ticks = run_poll_loop(&h.engine, fast(Some(4)), std::future::pending(), |r| {
            if r.is_err() {
                failures += 1;
            }
        })
        .await;

        assert_eq!(ticks, 4);
        assert_eq!(failures, 4);
    }

    #[tokio::test]
    async fn test_shutdown_ends_loop() {
        let h = harness(SyntheticProvider::new(vec![falling]));

        let ticks = run_poll_loop(&h.engine, fast(None), async {}, |_| {}).await;

        assert_eq!(ticks, 0);
    }
}
