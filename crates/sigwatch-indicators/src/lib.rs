//! Momentum indicators for the signal watcher.
//!
//! This crate provides:
//! - Exponentially weighted means with pandas-style centre-of-mass smoothing
//! - RSI, as a batch indicator and as a streaming update
//! - Stochastic RSI over a trailing window of RSI values
//!
//! Batch outputs are index-aligned to their input; positions inside the
//! warm-up span are `None`.

pub mod ewm;
pub mod momentum;

pub use ewm::{Ewm, StreamingEwm};
pub use momentum::{
    compute_rsi, compute_stoch_rsi, rsi_values, stoch_rsi_values, Rsi, StochRsi, StreamingRsi,
};

/// Default RSI lookback.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Default stochastic window over RSI values.
pub const DEFAULT_STOCH_PERIOD: usize = 14;
