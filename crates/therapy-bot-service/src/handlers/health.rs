//! Health check handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Which upstream providers have credentials.
    pub providers: ProviderStatus,
}

/// Credential presence per provider. A `false` here means every call to
/// that provider will fail with an authentication error.
#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    /// Bot token set.
    pub telegram: bool,
    /// Consumer key, secret, shortcode and passkey all set.
    pub mpesa: bool,
    /// API key set.
    pub openrouter: bool,
}

/// Health check endpoint.
///
/// Stays 200 with missing credentials; the bot still acknowledges
/// webhooks and callbacks in that state.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let config = &state.config;

    Json(HealthResponse {
        status: "ok",
        service: "therapy-bot",
        version: env!("CARGO_PKG_VERSION"),
        providers: ProviderStatus {
            telegram: !config.telegram_token.is_empty(),
            mpesa: config.mpesa.has_credentials(),
            openrouter: !config.openrouter_api_key.is_empty(),
        },
    })
}
