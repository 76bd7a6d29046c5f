//! Signal notification delivery.

mod console;
mod webhook;

pub use console::LogNotifier;
pub use webhook::{WebhookConfig, WebhookNotifier};
