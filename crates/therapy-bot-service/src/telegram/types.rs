//! Telegram Bot API types.

use serde::{Deserialize, Serialize};

use therapy_bot_core::ChatId;

/// Webhook update. Only text messages are handled.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Update sequence number.
    #[serde(default)]
    pub update_id: Option<i64>,
    /// New incoming message, if this update carries one.
    #[serde(default)]
    pub message: Option<Message>,
}

/// Incoming message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Conversation the message belongs to.
    pub chat: Chat,
    /// Text, absent for stickers, photos and the like.
    #[serde(default)]
    pub text: Option<String>,
}

/// Chat reference.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Chat id.
    pub id: ChatId,
}

impl Update {
    /// The chat and text of a text message, if this is one.
    #[must_use]
    pub fn text_message(&self) -> Option<(ChatId, &str)> {
        let message = self.message.as_ref()?;
        let text = message.text.as_deref()?;
        Some((message.chat.id, text))
    }
}

/// `sendMessage` request body.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a> {
    /// Target chat.
    pub chat_id: ChatId,
    /// Message text.
    pub text: &'a str,
}

/// Bot API response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Error description when `ok` is false.
    #[serde(default)]
    pub description: Option<String>,
    /// Error code when `ok` is false.
    #[serde(default)]
    pub error_code: Option<i64>,
}
