//! File-backed signal state.

use async_trait::async_trait;
use sigwatch_core::error::StateError;
use sigwatch_core::traits::StateStore;
use sigwatch_core::types::PersistedState;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Stores one pretty-printed JSON record per symbol in
/// `<dir>/<symbol>_signal_state.json`.
///
/// Writes go to a sibling `.tmp` file that is then renamed over the record,
/// so a crash mid-write leaves the previous state readable.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    dir: PathBuf,
}

impl JsonStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record path for a symbol. Path separators in the symbol are replaced.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        let name: String = symbol
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}_signal_state.json", name))
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn load(&self, symbol: &str) -> Result<PersistedState, StateError> {
        let path = self.path_for(symbol);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no saved signal state");
                return Ok(PersistedState::default());
            }
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(PersistedState::default());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    async fn save(&self, symbol: &str, state: &PersistedState) -> Result<(), StateError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(symbol);
        let tmp = path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(state)?;

        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &path).await?;

        info!(symbol, signal = %state.signal, path = %path.display(), "saved signal state");
        Ok(())
    }
}
