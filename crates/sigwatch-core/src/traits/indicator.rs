//! Indicator trait definition.

use crate::error::IndicatorError;

/// Trait for technical indicators over a price slice.
///
/// Output is index-aligned to the input: position `i` holds the value at
/// price `i`, or `None` where the indicator is undefined.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given prices.
    ///
    /// # Arguments
    /// * `data` - Prices, oldest first
    ///
    /// # Returns
    /// One entry per input price
    fn calculate(&self, data: &[f64]) -> Result<Vec<Option<f64>>, IndicatorError>;

    /// Minimum number of prices accepted by [`Indicator::calculate`].
    fn period(&self) -> usize;

    /// Number of leading positions that are always undefined.
    fn warmup(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Validate length and finiteness of the input.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.len() < self.period() {
            return Err(IndicatorError::InsufficientData {
                needed: self.period(),
                got: data.len(),
            });
        }
        if let Some(i) = data.iter().position(|v| !v.is_finite()) {
            return Err(IndicatorError::InvalidData(format!(
                "{}: non-finite price at index {}",
                self.name(),
                i
            )));
        }
        Ok(())
    }
}

/// Streaming indicator that maintains internal state.
///
/// Unlike batch indicators, streaming indicators can be updated
/// incrementally with new data points.
pub trait StreamingIndicator: Send + Sync {
    /// Update the indicator with a new value.
    ///
    /// # Returns
    /// The current indicator value, or None if not yet defined
    fn update(&mut self, value: f64) -> Option<f64>;

    /// Get the current value without adding new data.
    fn current(&self) -> Option<f64>;

    /// Reset the indicator state.
    fn reset(&mut self);

    /// Check if the indicator has seen enough data to produce values.
    fn is_ready(&self) -> bool;
}
