//! Telegram Bot API client implementation.

use reqwest::Client;

use therapy_bot_core::ChatId;

use super::types::{ApiResponse, SendMessageRequest};

/// Error type for Telegram delivery.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Bot API returned an error.
    #[error("Telegram API error: {status} - {description}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        description: String,
    },
}

/// Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    /// `{api}/bot{token}`. Contains the token, so never logged.
    bot_url: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient").finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Create a new Telegram client.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Bot API URL (e.g., `"https://api.telegram.org"`)
    /// * `token` - Bot token
    /// * `client` - Shared HTTP client
    pub fn new(api_url: &str, token: &str, client: Client) -> Self {
        Self {
            client,
            bot_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    /// Send a text message to a chat.
    pub async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError> {
        let response = self
            .client
            .post(format!("{}/sendMessage", self.bot_url))
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let description = match response.json::<ApiResponse>().await {
            Ok(body) => body
                .description
                .unwrap_or_else(|| format!("HTTP {status}")),
            Err(_) => format!("HTTP {status}"),
        };

        Err(TelegramError::Api {
            status: status.as_u16(),
            description,
        })
    }

    /// Send a message, logging and discarding any failure.
    pub async fn deliver(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.send_message(chat_id, text).await {
            // reqwest errors carry the URL, which contains the bot token.
            let e = match e {
                TelegramError::Http(err) => TelegramError::Http(err.without_url()),
                api @ TelegramError::Api { .. } => api,
            };
            tracing::error!(chat_id = %chat_id, error = %e, "Failed to deliver Telegram message");
        }
    }
}
