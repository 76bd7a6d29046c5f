//! Signal state machine and notifier gate.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sigwatch_core::error::{StateError, WatchError};
use sigwatch_core::traits::{Notifier, StateStore};
use sigwatch_core::types::{PersistedState, SignalState, TimeframeSnapshot};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::transition::SignalTransition;

/// What the gate did with an evaluated signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GateOutcome {
    /// Evaluated signal equals the persisted one; nothing written or sent.
    Unchanged,
    /// A new non-default signal was persisted and a notification attempted.
    Transitioned {
        from: SignalState,
        to: SignalState,
        notified: bool,
    },
    /// The signal went back to `None`; persisted without a notification.
    Reverted { from: SignalState },
}

impl GateOutcome {
    pub fn is_change(&self) -> bool {
        !matches!(self, GateOutcome::Unchanged)
    }
}

/// Owns the persisted signal for the watcher and decides when to notify.
///
/// At most one notification is sent per distinct change, and none while the
/// evaluated signal stays the same.
pub struct SignalGate {
    store: Arc<dyn StateStore>,
    notifier: Arc<dyn Notifier>,
}

impl SignalGate {
    pub fn new(store: Arc<dyn StateStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Last accepted signal for `symbol`, `None` if never recorded.
    pub async fn current(&self, symbol: &str) -> Result<SignalState, StateError> {
        Ok(self.store.load(symbol).await?.signal)
    }

    /// Apply a freshly evaluated signal.
    ///
    /// `previous` must be the value read by [`SignalGate::current`] earlier in
    /// the same tick. The transition is persisted before notifying; a
    /// notification failure is logged and does not undo the write.
    pub async fn apply(
        &self,
        symbol: &str,
        previous: SignalState,
        evaluated: SignalState,
        snapshots: &[TimeframeSnapshot],
        at: DateTime<Utc>,
    ) -> Result<GateOutcome, WatchError> {
        if evaluated == previous {
            debug!(symbol, signal = %evaluated, "signal unchanged");
            return Ok(GateOutcome::Unchanged);
        }

        self.store
            .save(symbol, &PersistedState::new(evaluated, at))
            .await?;

        if evaluated.is_none() {
            info!(symbol, from = %previous, "signal reverted to none, not notifying");
            return Ok(GateOutcome::Reverted { from: previous });
        }

        let transition = SignalTransition::new(symbol, previous, evaluated, at, snapshots);
        info!(
            symbol,
            from = %previous,
            to = %evaluated,
            notifier = self.notifier.name(),
            "signal changed"
        );

        let notified = match self
            .notifier
            .notify(&transition.subject(), &transition.body())
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(symbol, error = %e, "failed to deliver signal notification");
                false
            }
        };

        Ok(GateOutcome::Transitioned {
            from: previous,
            to: evaluated,
            notified,
        })
    }
}
