//! Progress notifier - posts human-readable progress to a Telegram chat
//!
//! Strictly a side channel: every failure here is logged and swallowed,
//! never propagated into the pipeline.

use mailcast_common::config::TelegramConfig;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Telegram Bot API client for coarse progress messages.
pub struct TelegramNotifier {
    config: TelegramConfig,
    client: Client,
}

impl TelegramNotifier {
    /// Create a new notifier
    pub fn new(config: TelegramConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Post `text` to the configured chat. No-op when disabled or
    /// unconfigured; errors never escape.
    pub async fn notify(&self, text: &str) {
        if !self.config.enabled || self.config.api_token.is_empty() {
            debug!("Notifier disabled, dropping: {}", text);
            return;
        }

        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_url, self.config.api_token
        );
        let body = SendMessage {
            chat_id: &self.config.chat_id,
            text,
        };

        match self.client.post(&url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                warn!("Notifier returned status {}: {}", response.status(), text);
            }
            Err(e) => {
                warn!("Notifier request failed: {}", e);
            }
        }
    }
}
