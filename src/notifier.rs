//! Notification delivery
//!
//! [`SlackWebhook`] posts `{"text": ...}` to a Slack-compatible incoming
//! webhook. Without a webhook configured, [`LogNotifier`] writes the text to
//! the log instead.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::errors::AisWatchError;

/// HTTP request timeout for a single delivery
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), AisWatchError>;
}

pub struct SlackWebhook {
    client: reqwest::Client,
    url: String,
}

impl SlackWebhook {
    pub fn new(url: impl Into<String>) -> Result<Self, AisWatchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for SlackWebhook {
    async fn send(&self, text: &str) -> Result<(), AisWatchError> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AisWatchError::NotificationError(format!(
                "Slack error {}: {}",
                status.as_u16(),
                body
            )));
        }
        Ok(())
    }
}

/// Writes notifications to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> Result<(), AisWatchError> {
        info!("Notification (no webhook configured):\n{}", text);
        Ok(())
    }
}
