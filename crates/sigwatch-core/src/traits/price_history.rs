//! Price history provider trait.

use crate::error::DataError;
use crate::types::PriceSeries;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of historical price series.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Fetch prices for a window ending at `end`.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `interval_minutes` - Sampling interval of the returned points
    /// * `lookback_minutes` - Length of the window before `end`
    /// * `end` - End of the window, normally the tick instant
    ///
    /// # Returns
    /// A series ordered oldest to newest. An empty series means the provider
    /// had no data for the window; that is not an error at this level.
    async fn fetch(
        &self,
        symbol: &str,
        interval_minutes: u32,
        lookback_minutes: u32,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, DataError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}
