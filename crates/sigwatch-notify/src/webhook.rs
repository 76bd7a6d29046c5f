//! HTTP webhook notifier.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use sigwatch_core::error::NotifyError;
use sigwatch_core::traits::Notifier;
use std::time::Duration;
use tracing::debug;

/// Webhook endpoint configuration.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout: Duration,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// JSON payload posted to the webhook.
///
/// `text` repeats subject and body for chat services that only render a
/// single field.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    subject: &'a str,
    body: &'a str,
    text: String,
}

/// Posts notifications as JSON to an HTTP endpoint.
pub struct WebhookNotifier {
    config: WebhookConfig,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self, NotifyError> {
        if config.url.trim().is_empty() {
            return Err(NotifyError::Configuration("webhook URL is empty".into()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotifyError::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            subject,
            body,
            text: format!("*{}*\n{}", subject, body),
        };

        let resp = self
            .client
            .post(&self.config.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Delivery(format!("{}: {}", status, text)));
        }

        debug!(subject, url = %self.config.url, "webhook delivered");
        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_empty_url_rejected() {
        assert!(matches!(
            WebhookNotifier::new(WebhookConfig::new("  ")),
            Err(NotifyError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_posts_json_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "subject": "BTC SELL Signal",
                "body": "A sell signal has been detected for BTC.",
            })))
            .with_status(204)
            .create_async()
            .await;

        let notifier =
            WebhookNotifier::new(WebhookConfig::new(format!("{}/hook", server.url()))).unwrap();
        notifier
            .notify("BTC SELL Signal", "A sell signal has been detected for BTC.")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_delivery_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/hook")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let notifier =
            WebhookNotifier::new(WebhookConfig::new(format!("{}/hook", server.url()))).unwrap();
        let err = notifier.notify("s", "b").await.unwrap_err();

        match err {
            NotifyError::Delivery(msg) => assert!(msg.contains("500") && msg.contains("boom")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
