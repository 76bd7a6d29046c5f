//! Console notifier.

use async_trait::async_trait;
use sigwatch_core::error::NotifyError;
use sigwatch_core::traits::Notifier;
use std::io::Write;
use tracing::info;

/// Writes notifications to the log and to stdout.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        info!(subject, "signal notification");

        let mut out = std::io::stdout().lock();
        writeln!(out, "\n=== {} ===\n{}", subject, body)
            .and_then(|_| out.flush())
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }

    fn name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_delivers() {
        let notifier = LogNotifier::new();
        assert!(notifier.notify("BTC BUY Signal", "body").await.is_ok());
        assert_eq!(notifier.name(), "log");
    }
}
