//! M-Pesa Daraja integration for STK Push payments.
//!
//! Daraja handles:
//! - OAuth client-credentials token issuance
//! - STK Push submission (the prompt on the payer's phone)
//! - Asynchronous result callbacks, handled in `handlers::mpesa`

pub mod client;
pub mod types;

pub use client::{InitiationFailed, MpesaClient, MpesaError, RetryPolicy};
pub use types::*;
