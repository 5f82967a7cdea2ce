//! Error types for the therapy bot core.

/// Result type for core validation.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors raised while validating identifiers and payment inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Chat id is not a signed 64-bit integer.
    #[error("invalid chat id: {0}")]
    InvalidChatId(String),

    /// Correlation id does not have the `{chat_id}[.{turn}]` shape.
    #[error("invalid correlation id: {0}")]
    InvalidCorrelationId(String),

    /// Phone number does not match the Safaricom `2547XXXXXXXX` pattern.
    #[error("invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    /// Payment amounts must be strictly positive.
    #[error("invalid amount: {0}")]
    InvalidAmount(u32),
}
