//! Therapy Bot HTTP Service.
//!
//! This crate serves the Telegram bot behind therapy session bookings:
//!
//! - Telegram webhook: keyword routing, AI replies, payment triggers
//! - M-Pesa STK Push initiation via Daraja
//! - STK Push result callbacks relayed back to the chat
//!
//! # Payment flow
//!
//! A user who mentions distress or booking keywords is asked for a Safaricom
//! number. Sending one starts an STK Push whose callback URL carries a
//! `CorrelationId` naming the chat. The provider later posts the result to
//! that URL and the bot reports success (with receipt) or failure.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Health handler needs async for routing

pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod mpesa;
pub mod openrouter;
pub mod routes;
pub mod state;
pub mod telegram;

pub use config::{MpesaConfig, ServiceConfig};
pub use error::{ApiError, StartupError};
pub use mpesa::{InitiationFailed, MpesaClient, MpesaError, RetryPolicy};
pub use openrouter::{AiError, OpenRouterClient};
pub use routes::create_router;
pub use state::AppState;
pub use telegram::{TelegramClient, TelegramError};
