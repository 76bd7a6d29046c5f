//! Core data types for the signal watcher.

mod indicator;
mod price;
mod signal;
mod snapshot;
mod timeframe;

pub use indicator::{IndicatorPoint, IndicatorSeries};
pub use price::{PricePoint, PriceSeries};
pub use signal::{PersistedState, SignalState};
pub use snapshot::{IndicatorKind, TimeframeSnapshot};
pub use timeframe::Timeframe;
