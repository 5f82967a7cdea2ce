//! Daraja API types.

use serde::Deserialize;

/// `GET /oauth/v1/generate` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Bearer token for subsequent calls.
    pub access_token: String,
}

/// Synchronous STK Push acknowledgment.
///
/// Only says the request was accepted for processing. The payment outcome
/// arrives later on the callback URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkPushResponse {
    /// Merchant request id.
    #[serde(rename = "MerchantRequestID")]
    pub merchant_request_id: String,
    /// Checkout request id, echoed in the callback.
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,
    /// `"0"` when accepted.
    pub response_code: String,
    /// Description of the response code.
    #[serde(default)]
    pub response_description: String,
    /// Text meant for the customer.
    #[serde(default)]
    pub customer_message: Option<String>,
}

impl StkPushResponse {
    /// Whether the provider accepted the request for processing.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.response_code == "0"
    }
}

/// Error body returned on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DarajaErrorResponse {
    /// Provider request id.
    #[serde(default)]
    pub request_id: Option<String>,
    /// Dotted error code, e.g. `400.002.02`.
    #[serde(default)]
    pub error_code: Option<String>,
    /// Error message.
    #[serde(default)]
    pub error_message: Option<String>,
}

impl DarajaErrorResponse {
    /// Whether the provider rejected the password timestamp.
    #[must_use]
    pub fn is_invalid_timestamp(&self) -> bool {
        self.error_message
            .as_deref()
            .is_some_and(|m| m.to_ascii_lowercase().contains("invalid timestamp"))
    }
}
