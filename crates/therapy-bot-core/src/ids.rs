//! Identifier types for the therapy bot.
//!
//! `ChatId` is the Telegram conversation, `CorrelationId` ties an STK Push
//! callback back to that conversation, and `PhoneNumber` is a validated
//! Safaricom MSISDN.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// A Telegram chat identifier.
///
/// Group chats have negative ids, so this is signed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(i64);

impl ChatId {
    /// Wrap a raw Telegram chat id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Return the raw id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for ChatId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidChatId(s.to_string()))
    }
}

impl fmt::Debug for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChatId({})", self.0)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Binds an asynchronous payment callback to the conversation turn that
/// started the payment.
///
/// Rendered as `{chat_id}.{turn}` where `turn` is a fresh UUID per payment
/// attempt. A bare `{chat_id}` is also accepted when parsing, since callback
/// URLs issued without a turn token carry only the chat id.
///
/// Nothing records which ids were issued. Whatever arrives on the callback
/// path is taken at face value, and the last callback for a chat wins.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationId {
    chat_id: ChatId,
    turn: Option<Uuid>,
}

impl CorrelationId {
    /// Issue a new correlation id for one payment attempt in `chat_id`.
    #[must_use]
    pub fn issue(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            turn: Some(Uuid::new_v4()),
        }
    }

    /// A correlation id carrying only the chat id.
    #[must_use]
    pub const fn for_chat(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            turn: None,
        }
    }

    /// The chat the eventual payment result should be delivered to.
    #[must_use]
    pub const fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// The per-attempt token, if one was issued.
    #[must_use]
    pub const fn turn(&self) -> Option<Uuid> {
        self.turn
    }
}

impl FromStr for CorrelationId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidCorrelationId(s.to_string());

        let (chat, turn) = match s.split_once('.') {
            Some((chat, turn)) => (chat, Some(Uuid::parse_str(turn).map_err(|_| invalid())?)),
            None => (s, None),
        };

        let chat_id = chat.parse::<ChatId>().map_err(|_| invalid())?;

        Ok(Self { chat_id, turn })
    }
}

impl fmt::Debug for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CorrelationId({self})")
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.turn {
            Some(turn) => write!(f, "{}.{}", self.chat_id, turn.simple()),
            None => write!(f, "{}", self.chat_id),
        }
    }
}

/// Safaricom mobile number pattern: country code 254, then a 7, then 8 digits.
// ASCII digits only; `\d` would also accept other Unicode digits.
const PHONE_PATTERN: &str = r"^2547[0-9]{8}$";

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    // INVARIANT: PHONE_PATTERN is a constant, valid regex.
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex"))
}

/// A 12-digit Safaricom number in `2547XXXXXXXX` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Returns the number as sent to the provider.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PhoneNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if phone_regex().is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ValidationError::InvalidPhoneNumber(s.to_string()))
        }
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
