//! Signal watcher engine.
//!
//! One tick fetches every configured timeframe, reduces each to a
//! [`TimeframeSnapshot`](sigwatch_core::types::TimeframeSnapshot), evaluates
//! the combined signal and hands it to the notifier gate. The poll loop runs
//! ticks back to back on a fixed period.

mod aggregator;
mod engine;
mod lookback;
mod poll;

pub use aggregator::{build_snapshot, TimeframeAggregator};
pub use engine::{TickReport, WatchConfig, WatchEngine};
pub use lookback::LookbackPolicy;
pub use poll::{run_poll_loop, PollConfig};
