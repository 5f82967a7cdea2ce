//! Core types and utilities for the therapy booking bot.
//!
//! This crate holds everything that does not touch the network:
//!
//! - **Identifiers**: `ChatId`, `CorrelationId`, `PhoneNumber`
//! - **STK Push encoding**: `Amount`, `Timestamp`, `StkPushEncoder`, `StkPushRequest`
//! - **Callbacks**: `CallbackNotification`, `PaymentOutcome`
//! - **Conversation**: `Intent` classification and the fixed bot replies
//!
//! # Correlation
//!
//! A payment callback arrives on a separate HTTP request from the chat message
//! that triggered it. The only link between the two is the `CorrelationId`
//! embedded in the callback URL. It is trusted as-is: there is no record of
//! outstanding requests, so a forged or repeated callback is indistinguishable
//! from a genuine one.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod callback;
pub mod conversation;
pub mod error;
pub mod ids;
pub mod stk;

pub use callback::{
    CallbackEnvelope, CallbackNotification, PaymentOutcome, RECEIPT_ITEM_NAME,
    SUCCESS_RESULT_CODE,
};
pub use conversation::{
    classify, initiating_payment, phone_prompt, Intent, AI_EMPTY_REPLY, AI_ERROR_REPLY,
    INITIATION_FAILED, THERAPIST_KEYWORDS,
};
pub use error::{Result, ValidationError};
pub use ids::{ChatId, CorrelationId, PhoneNumber};
pub use stk::{
    password, Amount, PaymentRequest, StkPushEncoder, StkPushRequest, Timestamp,
    CALLBACK_PATH, TRANSACTION_TYPE,
};
