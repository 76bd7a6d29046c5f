//! Exponentially weighted moving averages.

use sigwatch_core::traits::StreamingIndicator;

/// Exponentially weighted mean in its adjusted form.
///
/// Each output is `Σ (1-α)^i · x[t-i] / Σ (1-α)^i` over every observation so
/// far, with `α = 1 / (1 + com)`. Values are withheld until `min_periods`
/// observations have been seen.
#[derive(Debug, Clone)]
pub struct Ewm {
    alpha: f64,
    min_periods: usize,
}

impl Ewm {
    /// Create from a centre of mass (`com = period - 1` gives Wilder's α = 1/period).
    pub fn with_com(com: f64, min_periods: usize) -> Self {
        assert!(com >= 0.0, "Centre of mass must be non-negative");
        Self {
            alpha: 1.0 / (1.0 + com),
            min_periods,
        }
    }

    /// Wilder smoothing for the given period.
    pub fn wilder(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self::with_com(period as f64 - 1.0, period)
    }

    /// Smoothing factor α.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Calculate the weighted mean at every position of `data`.
    pub fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut stream = StreamingEwm::new(self.alpha, self.min_periods);
        data.iter().map(|&x| stream.update(x)).collect()
    }
}

/// Streaming adjusted EWM that maintains state for incremental updates.
#[derive(Debug, Clone)]
pub struct StreamingEwm {
    decay: f64,
    min_periods: usize,
    numerator: f64,
    denominator: f64,
    count: usize,
}

impl StreamingEwm {
    /// Create a new streaming EWM with smoothing factor `alpha` in (0, 1].
    pub fn new(alpha: f64, min_periods: usize) -> Self {
        assert!(
            alpha > 0.0 && alpha <= 1.0,
            "Alpha must be in (0, 1]"
        );
        Self {
            decay: 1.0 - alpha,
            min_periods,
            numerator: 0.0,
            denominator: 0.0,
            count: 0,
        }
    }

    /// Number of observations seen.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The running mean regardless of `min_periods`.
    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.numerator / self.denominator)
    }
}

impl StreamingIndicator for StreamingEwm {
    fn update(&mut self, value: f64) -> Option<f64> {
        self.numerator = value + self.decay * self.numerator;
        self.denominator = 1.0 + self.decay * self.denominator;
        self.count += 1;
        self.current()
    }

    fn current(&self) -> Option<f64> {
        if self.is_ready() {
            self.mean()
        } else {
            None
        }
    }

    fn reset(&mut self) {
        self.numerator = 0.0;
        self.denominator = 0.0;
        self.count = 0;
    }

    fn is_ready(&self) -> bool {
        self.count >= self.min_periods.max(1)
    }
}
