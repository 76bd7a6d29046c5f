//! Signal evaluation for the watcher.
//!
//! - [`SignalEvaluator`] folds per-timeframe snapshots into one signal
//! - [`SignalGate`] persists accepted transitions and notifies on change

mod evaluator;
mod gate;
mod transition;

pub use evaluator::{EvaluatorConfig, SignalEvaluator, SignalThresholds};
pub use gate::{GateOutcome, SignalGate};
pub use transition::SignalTransition;
