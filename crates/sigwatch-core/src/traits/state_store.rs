//! Persisted signal state storage.

use crate::error::StateError;
use crate::types::PersistedState;
use async_trait::async_trait;

/// Durable per-symbol store for the last accepted signal.
///
/// A symbol with no record loads as the default state.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the state for a symbol.
    async fn load(&self, symbol: &str) -> Result<PersistedState, StateError>;

    /// Overwrite the state for a symbol.
    async fn save(&self, symbol: &str, state: &PersistedState) -> Result<(), StateError>;
}
