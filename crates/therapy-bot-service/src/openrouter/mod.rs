//! `OpenRouter` chat completions for free-form conversation.

pub mod client;
pub mod types;

pub use client::{AiError, OpenRouterClient};
pub use types::*;
