//! Telegram Bot API integration.
//!
//! Inbound updates arrive on the webhook route; replies go out through
//! `sendMessage`. Delivery failures are logged and dropped, since the chat
//! is the only channel we could report them on.

pub mod client;
pub mod types;

pub use client::{TelegramClient, TelegramError};
pub use types::*;
