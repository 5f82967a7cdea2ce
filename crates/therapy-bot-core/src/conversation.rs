//! Intent classification for inbound chat messages.
//!
//! A message is checked against the distress and booking keywords first,
//! then against the phone number pattern. Everything else goes to the AI
//! assistant.

use crate::ids::PhoneNumber;
use crate::stk::Amount;

/// Substrings that route a message to the therapist booking prompt.
pub const THERAPIST_KEYWORDS: &[&str] = &[
    "depressed",
    "anxious",
    "hopeless",
    "suicidal",
    "worthless",
    "book therapist",
    "talk to therapist",
];

/// Sent when a payment could not be started.
pub const INITIATION_FAILED: &str = "❌ Failed to initiate payment. Please try again later.";

/// Sent when the AI provider answered without any content.
pub const AI_EMPTY_REPLY: &str = "Sorry, I couldn't understand that.";

/// Sent when the AI provider call failed.
pub const AI_ERROR_REPLY: &str = "Something went wrong.";

/// What the bot should do with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Ask for a phone number to book a paid session.
    TherapistReferral,
    /// Start an STK Push to this number.
    Payment(PhoneNumber),
    /// Forward the (lowercased) text to the assistant.
    Chat(String),
}

/// Classify a message. Keywords take precedence over phone numbers.
#[must_use]
pub fn classify(text: &str) -> Intent {
    let text = text.trim().to_lowercase();

    if THERAPIST_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
        return Intent::TherapistReferral;
    }

    match text.parse::<PhoneNumber>() {
        Ok(phone) => Intent::Payment(phone),
        Err(_) => Intent::Chat(text),
    }
}

/// Prompt asking for the payer's number.
#[must_use]
pub fn phone_prompt(amount: Amount) -> String {
    format!(
        "📞 Please share your Safaricom phone number (format: 2547XXXXXXXX) to book a therapist session (KES {amount})."
    )
}

/// Acknowledgment sent before the STK Push is submitted.
#[must_use]
pub fn initiating_payment(amount: Amount) -> String {
    format!("✅ Initiating M-Pesa payment for KES {amount}...")
}
