//! `OpenRouter` API client implementation.

use reqwest::Client;

use therapy_bot_core::{AI_EMPTY_REPLY, AI_ERROR_REPLY};

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ErrorResponse};

/// Error type for AI completion calls.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// `OpenRouter` returned an error.
    #[error("OpenRouter API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },
}

/// `OpenRouter` API client.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenRouterClient {
    /// Create a new `OpenRouter` client.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Ask the model to answer a single user message.
    ///
    /// Returns `None` when the response has no usable content.
    pub async fn complete(&self, prompt: &str) -> Result<Option<String>, AiError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => format!("HTTP {status}"),
            };
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        Ok(completion.first_content().map(str::to_string))
    }

    /// Reply text for the user. Never fails: errors become a fallback message.
    pub async fn reply(&self, prompt: &str) -> String {
        match self.complete(prompt).await {
            Ok(Some(content)) => content,
            Ok(None) => AI_EMPTY_REPLY.to_string(),
            Err(e) => {
                tracing::error!(error = %e, model = %self.model, "AI completion failed");
                AI_ERROR_REPLY.to_string()
            }
        }
    }
}
