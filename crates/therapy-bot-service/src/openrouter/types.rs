//! `OpenRouter` API types.

use serde::{Deserialize, Serialize};

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    /// Model slug.
    pub model: &'a str,
    /// Conversation so far. Always a single user message.
    pub messages: Vec<ChatMessage<'a>>,
}

/// One chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    /// `"user"`.
    pub role: &'a str,
    /// Message text.
    pub content: &'a str,
}

/// Chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Candidate completions.
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One completion candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The assistant message.
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

/// Assistant message content.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Text; may be null for tool calls or refusals.
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if it has any.
    #[must_use]
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
            .filter(|c| !c.is_empty())
    }
}

/// Error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Error details.
    pub error: ErrorDetail,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    /// Error message.
    pub message: String,
}
