//! STK Push result callbacks from Daraja.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use therapy_bot_core::{CallbackNotification, CorrelationId, PaymentOutcome};

use crate::state::AppState;

/// Acknowledgment body Daraja expects from a callback endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallbackAck {
    /// Always zero.
    pub result_code: i64,
    /// Always `"Accepted"`.
    pub result_desc: &'static str,
}

impl CallbackAck {
    fn accepted() -> Self {
        Self {
            result_code: 0,
            result_desc: "Accepted",
        }
    }
}

/// Handle `POST /mpesa/callback/:correlation_id`.
///
/// Always acknowledges with 200. Any other status makes the provider retry
/// the callback, and nothing here would detect the duplicate.
pub async fn mpesa_callback(
    State(state): State<Arc<AppState>>,
    correlation: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Json<CallbackAck> {
    let correlation_id = match correlation
        .map_err(|e| e.body_text())
        .and_then(|Path(raw)| raw.parse::<CorrelationId>().map_err(|e| e.to_string()))
    {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "STK callback with unusable correlation id, dropping");
            return Json(CallbackAck::accepted());
        }
    };

    let decoded = body
        .map_err(|e| e.body_text())
        .and_then(|body| {
            CallbackNotification::decode(&body, correlation_id).map_err(|e| e.to_string())
        });

    let outcome = match decoded {
        Ok(notification) => {
            tracing::info!(
                correlation_id = %correlation_id,
                checkout_request_id = ?notification.checkout_request_id,
                result_code = notification.result_code,
                has_receipt = notification.receipt_number.is_some(),
                "Received STK callback"
            );
            notification.outcome()
        }
        Err(e) => {
            tracing::warn!(
                correlation_id = %correlation_id,
                error = %e,
                "Malformed STK callback, reporting failure"
            );
            PaymentOutcome::Failed
        }
    };

    state
        .telegram
        .deliver(correlation_id.chat_id(), &outcome.message())
        .await;

    Json(CallbackAck::accepted())
}
