use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::infrastructure::api::error::ApiClientError;
use crate::utils::logging;

const TELEGRAM_URL: &str = "https://api.telegram.org";

#[derive(Debug, Serialize, PartialEq)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Posts markdown reports to one Telegram chat
pub struct TelegramNotifier {
    client: Client,
    base_url: String,
    bot_id: String,
    recipient_id: String,
}

impl TelegramNotifier {
    /// `None` unless both the bot id and the recipient are set
    pub fn new(bot_id: &str, recipient_id: &str) -> Result<Option<Self>, ApiClientError> {
        Self::with_base_url(TELEGRAM_URL, bot_id, recipient_id)
    }

    pub fn with_base_url(
        base_url: &str,
        bot_id: &str,
        recipient_id: &str,
    ) -> Result<Option<Self>, ApiClientError> {
        if bot_id.is_empty() || recipient_id.is_empty() {
            return Ok(None);
        }
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Some(TelegramNotifier {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bot_id: bot_id.to_string(),
            recipient_id: recipient_id.to_string(),
        }))
    }

    fn payload<'a>(&'a self, text: &'a str) -> SendMessage<'a> {
        SendMessage {
            chat_id: &self.recipient_id,
            text,
            parse_mode: "markdown",
        }
    }

    pub async fn send(&self, text: &str) -> Result<(), ApiClientError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_id);
        let response = self.client.post(&url).json(&self.payload(text)).send().await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ApiClientError::ApiError {
                endpoint: format!("{}/bot***/sendMessage", self.base_url),
                status: status.as_u16(),
                body,
            });
        }

        logging::log_debug(&format!("Telegram replied: {}", body));
        Ok(())
    }
}
