//! Notifier trait definition.

use crate::error::NotifyError;
use async_trait::async_trait;

/// Delivers signal-change messages to an operator.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message. Callers do not retry on failure.
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError>;

    /// Get the notifier name.
    fn name(&self) -> &str;
}
