//! Core types and traits for the signal watcher.
//!
//! This crate provides the foundational building blocks including:
//! - Price data types (PricePoint, PriceSeries)
//! - Indicator series and per-timeframe snapshots
//! - The signal state enumeration and its persisted form
//! - Collaborator traits for price history, notification and state storage

pub mod error;
pub mod traits;
pub mod types;

pub use error::{WatchError, WatchResult};
pub use traits::*;
pub use types::*;
