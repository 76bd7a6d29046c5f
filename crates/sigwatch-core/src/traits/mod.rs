//! Core traits for the signal watcher.

mod indicator;
mod notifier;
mod price_history;
mod state_store;

pub use indicator::{Indicator, StreamingIndicator};
pub use notifier::Notifier;
pub use price_history::PriceHistoryProvider;
pub use state_store::StateStore;
