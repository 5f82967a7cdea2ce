//! Application state.

use std::time::Duration;

use reqwest::Client;

use therapy_bot_core::Amount;

use crate::config::ServiceConfig;
use crate::error::StartupError;
use crate::mpesa::MpesaClient;
use crate::openrouter::OpenRouterClient;
use crate::telegram::TelegramClient;

/// Application state shared across handlers.
///
/// Read-only after startup; concurrent requests share nothing mutable.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,

    /// Outbound chat delivery.
    pub telegram: TelegramClient,

    /// STK Push payments.
    pub mpesa: MpesaClient,

    /// Free-form replies.
    pub assistant: OpenRouterClient,

    /// Price of one therapy session.
    pub session_price: Amount,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: ServiceConfig) -> Result<Self, StartupError> {
        let session_price = Amount::new(config.mpesa.amount)?;

        // One connection pool for all three providers
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()?;

        let telegram = TelegramClient::new(
            &config.telegram_api_url,
            &config.telegram_token,
            http.clone(),
        );
        let mpesa = MpesaClient::new(&config.mpesa, http.clone());
        let assistant = OpenRouterClient::new(
            &config.openrouter_api_url,
            &config.openrouter_api_key,
            &config.openrouter_model,
            http,
        );

        tracing::info!(
            mpesa_url = %config.mpesa.api_url,
            callback_base_url = %config.mpesa.callback_base_url,
            model = %config.openrouter_model,
            session_price = %session_price,
            "Provider clients configured"
        );

        Ok(Self {
            config,
            telegram,
            mpesa,
            assistant,
            session_price,
        })
    }
}
