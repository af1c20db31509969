//! Telegram Bot API notifier.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

use super::Notifier;
use crate::config::TelegramConfig;
use crate::error::{AppError, Result};

const API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Sends HTML-formatted messages to a single chat.
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            config,
            api_base: API_BASE.to_string(),
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.config.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        let request = SendMessageRequest {
            chat_id: &self.config.chat_id,
            text: message,
            parse_mode: "HTML",
        };

        let response = self
            .client
            .post(self.send_message_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send Telegram message: {}", e);
                AppError::Provider(format!("Telegram request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Telegram rejected message: {} - {}", status, body);
            return Err(AppError::Provider(format!("Telegram error {}: {}", status, body)));
        }

        debug!("Telegram message delivered ({} chars)", message.chars().count());
        Ok(())
    }
}
