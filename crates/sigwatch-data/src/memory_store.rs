//! In-memory signal state.

use async_trait::async_trait;
use sigwatch_core::error::StateError;
use sigwatch_core::traits::StateStore;
use sigwatch_core::types::PersistedState;
use std::collections::HashMap;
use std::sync::Mutex;

/// Signal state kept for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    states: Mutex<HashMap<String, PersistedState>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of symbols with a recorded state.
    pub fn len(&self) -> usize {
        self.states.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every recorded state.
    pub fn clear(&self) {
        if let Ok(mut states) = self.states.lock() {
            states.clear();
        }
    }
}

fn poisoned() -> StateError {
    StateError::Io(std::io::Error::other("state store lock poisoned"))
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self, symbol: &str) -> Result<PersistedState, StateError> {
        let states = self.states.lock().map_err(|_| poisoned())?;
        Ok(states.get(symbol).copied().unwrap_or_default())
    }

    async fn save(&self, symbol: &str, state: &PersistedState) -> Result<(), StateError> {
        let mut states = self.states.lock().map_err(|_| poisoned())?;
        states.insert(symbol.to_string(), *state);
        Ok(())
    }
}
