//! Daraja API client implementation.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use therapy_bot_core::{PaymentRequest, StkPushEncoder, StkPushRequest, Timestamp};

use super::types::{DarajaErrorResponse, StkPushResponse, TokenResponse};
use crate::config::MpesaConfig;

/// Error type for Daraja operations.
#[derive(Debug, thiserror::Error)]
pub enum MpesaError {
    /// Token endpoint rejected the credentials or could not be reached.
    #[error("authentication failed: {message}")]
    Auth {
        /// HTTP status, if a response was received.
        status: Option<u16>,
        /// Error detail.
        message: String,
    },

    /// Provider declined the push request.
    #[error("submission rejected: {message}")]
    SubmissionRejected {
        /// Provider error or response code.
        code: Option<String>,
        /// Error detail.
        message: String,
    },

    /// Provider rejected the password timestamp.
    #[error("stale timestamp: {0}")]
    StaleTimestamp(String),

    /// Response body did not match the expected schema.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Submission request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// The payment could not be started. The user gets a generic failure reply.
#[derive(Debug, thiserror::Error)]
#[error("payment initiation failed: {cause}")]
pub struct InitiationFailed {
    /// What went wrong.
    #[source]
    pub cause: MpesaError,
}

impl From<MpesaError> for InitiationFailed {
    fn from(cause: MpesaError) -> Self {
        Self { cause }
    }
}

/// Retry policy for the credential exchange.
///
/// Retrying is opt-in: the default makes a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// Attempts after the first.
    pub retries: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// A single attempt.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Up to `retries` further attempts, `backoff` apart.
    #[must_use]
    pub const fn with_retries(retries: u32, backoff: Duration) -> Self {
        Self { retries, backoff }
    }
}

/// Daraja API client.
#[derive(Debug, Clone)]
pub struct MpesaClient {
    client: Client,
    base_url: String,
    consumer_key: String,
    consumer_secret: String,
    encoder: StkPushEncoder,
    token_retry: RetryPolicy,
}

impl MpesaClient {
    /// Pause between token attempts when retries are configured.
    const TOKEN_RETRY_BACKOFF: Duration = Duration::from_millis(500);

    /// Create a new Daraja client from merchant settings.
    pub fn new(config: &MpesaConfig, client: Client) -> Self {
        Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
            encoder: StkPushEncoder::new(
                &config.shortcode,
                &config.passkey,
                &config.callback_base_url,
                &config.account_reference,
                &config.transaction_desc,
            ),
            token_retry: RetryPolicy::with_retries(
                config.token_retry_attempts,
                Self::TOKEN_RETRY_BACKOFF,
            ),
        }
    }

    /// Exchange the consumer key and secret for a bearer token.
    ///
    /// Tokens are never cached; each payment fetches its own.
    pub async fn access_token(&self, retry: RetryPolicy) -> Result<String, MpesaError> {
        let mut attempt = 0;
        loop {
            match self.fetch_access_token().await {
                Ok(token) => return Ok(token),
                Err(e) if attempt < retry.retries => {
                    attempt += 1;
                    tracing::warn!(
                        error = %e,
                        attempt = attempt,
                        max_retries = retry.retries,
                        "M-Pesa token request failed, retrying"
                    );
                    tokio::time::sleep(retry.backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_access_token(&self) -> Result<String, MpesaError> {
        let url = format!("{}/oauth/v1/generate", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("grant_type", "client_credentials")])
            .basic_auth(&self.consumer_key, Some(&self.consumer_secret))
            .send()
            .await
            .map_err(|e| MpesaError::Auth {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| MpesaError::Auth {
            status: Some(status.as_u16()),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(MpesaError::Auth {
                status: Some(status.as_u16()),
                message: error_detail(status, &body),
            });
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| MpesaError::MalformedResponse(format!("token response: {e}")))?;

        if token.access_token.is_empty() {
            return Err(MpesaError::MalformedResponse(
                "token response: empty access_token".into(),
            ));
        }

        Ok(token.access_token)
    }

    /// Submit an encoded push request with a bearer token.
    pub async fn submit(
        &self,
        access_token: &str,
        request: &StkPushRequest,
    ) -> Result<StkPushResponse, MpesaError> {
        let url = format!("{}/mpesa/stkpush/v1/processrequest", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await?;

        self.handle_submission(response).await
    }

    /// Start an STK Push for `request`.
    ///
    /// Fetches a fresh token, signs the request with the current time and
    /// submits it. Success means the provider accepted the request for
    /// processing; the payment result arrives later on the callback URL.
    pub async fn initiate_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<StkPushResponse, InitiationFailed> {
        let token = self.access_token(self.token_retry).await?;

        // Timestamp after the token exchange so the password is as fresh as possible.
        let timestamp = Timestamp::now();
        let body = self.encoder.encode(request, &timestamp);

        tracing::debug!(
            correlation_id = %request.correlation_id,
            amount = %request.amount,
            timestamp = %timestamp,
            "Submitting STK push"
        );

        let ack = self.submit(&token, &body).await?;

        tracing::info!(
            correlation_id = %request.correlation_id,
            merchant_request_id = %ack.merchant_request_id,
            checkout_request_id = %ack.checkout_request_id,
            "STK push accepted for processing"
        );

        Ok(ack)
    }

    /// Decode the acknowledgment or classify the rejection.
    async fn handle_submission(
        &self,
        response: reqwest::Response,
    ) -> Result<StkPushResponse, MpesaError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(rejection(status, &body));
        }

        let ack: StkPushResponse = serde_json::from_str(&body)
            .map_err(|e| MpesaError::MalformedResponse(format!("STK push response: {e}")))?;

        if !ack.is_accepted() {
            return Err(MpesaError::SubmissionRejected {
                code: Some(ack.response_code),
                message: ack.response_description,
            });
        }

        Ok(ack)
    }
}

fn rejection(status: StatusCode, body: &str) -> MpesaError {
    match serde_json::from_str::<DarajaErrorResponse>(body) {
        Ok(err) if err.is_invalid_timestamp() => {
            MpesaError::StaleTimestamp(err.error_message.unwrap_or_default())
        }
        Ok(err) => MpesaError::SubmissionRejected {
            message: err
                .error_message
                .unwrap_or_else(|| format!("HTTP {status}")),
            code: err.error_code,
        },
        Err(_) => MpesaError::SubmissionRejected {
            code: None,
            message: format!("HTTP {status}"),
        },
    }
}

fn error_detail(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<DarajaErrorResponse>(body)
        .ok()
        .and_then(|err| err.error_message)
        .unwrap_or_else(|| format!("HTTP {status}"))
}
