//! Telegram webhook handler and conversation routing.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use therapy_bot_core::{
    classify, initiating_payment, phone_prompt, ChatId, CorrelationId, Intent, PaymentRequest,
    PhoneNumber, INITIATION_FAILED,
};

use crate::crypto::constant_time_eq;
use crate::error::ApiError;
use crate::state::AppState;
use crate::telegram::Update;

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Whether the webhook was received.
    pub received: bool,
}

/// Handle Telegram updates posted to `/webhook/:token`.
///
/// Anything that is not a text message is acknowledged and ignored. Every
/// failure past the token check is handled here and never fails the request.
pub async fn telegram_webhook(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    if !constant_time_eq(&token, &state.config.telegram_token) {
        tracing::warn!("Telegram webhook called with wrong token");
        return Err(ApiError::NotFound("Unknown webhook".into()));
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unparseable Telegram update");
            return Ok(Json(WebhookResponse { received: true }));
        }
    };

    match update.text_message() {
        Some((chat_id, text)) => handle_message(&state, chat_id, text).await,
        None => {
            tracing::debug!(update_id = ?update.update_id, "Ignoring non-text update");
        }
    }

    Ok(Json(WebhookResponse { received: true }))
}

/// Route one text message to the referral prompt, a payment, or the assistant.
pub async fn handle_message(state: &AppState, chat_id: ChatId, text: &str) {
    match classify(text) {
        Intent::TherapistReferral => {
            tracing::info!(chat_id = %chat_id, "Therapist keyword matched");
            state
                .telegram
                .deliver(chat_id, &phone_prompt(state.session_price))
                .await;
        }
        Intent::Payment(phone) => start_payment(state, chat_id, phone).await,
        Intent::Chat(prompt) => {
            tracing::debug!(chat_id = %chat_id, "Forwarding message to assistant");
            let reply = state.assistant.reply(&prompt).await;
            state.telegram.deliver(chat_id, &reply).await;
        }
    }
}

async fn start_payment(state: &AppState, chat_id: ChatId, phone: PhoneNumber) {
    state
        .telegram
        .deliver(chat_id, &initiating_payment(state.session_price))
        .await;

    let request = PaymentRequest {
        phone,
        amount: state.session_price,
        correlation_id: CorrelationId::issue(chat_id),
    };

    tracing::info!(
        chat_id = %chat_id,
        correlation_id = %request.correlation_id,
        amount = %request.amount,
        "Initiating STK push"
    );

    if let Err(e) = state.mpesa.initiate_payment(&request).await {
        tracing::error!(
            chat_id = %chat_id,
            correlation_id = %request.correlation_id,
            error = %e,
            "STK push initiation failed"
        );
        state.telegram.deliver(chat_id, INITIATION_FAILED).await;
    }
}
