//! STK Push (Lipa na M-Pesa Online) request encoding.
//!
//! The provider authenticates each push request with a password derived from
//! the business shortcode, the shared passkey and a 14-digit timestamp. The
//! password is only valid close to the timestamp it was built from, so both
//! must be produced at send time.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::ValidationError;
use crate::ids::{CorrelationId, PhoneNumber};

/// Transaction type for paybill STK pushes.
pub const TRANSACTION_TYPE: &str = "CustomerPayBillOnline";

/// Route prefix the provider posts results to.
pub const CALLBACK_PATH: &str = "/mpesa/callback";

/// The provider validates timestamps in East Africa Time.
const PROVIDER_UTC_OFFSET_HOURS: i64 = 3;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// A strictly positive payment amount in whole Kenyan shillings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(u32);

impl Amount {
    /// Validate an amount.
    pub fn new(kes: u32) -> crate::Result<Self> {
        if kes == 0 {
            return Err(ValidationError::InvalidAmount(kes));
        }
        Ok(Self(kes))
    }

    /// Whole shillings.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `YYYYMMDDHHmmss` timestamp in provider local time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp(String);

impl Timestamp {
    /// The current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Render `instant` in the provider's timezone.
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        let local = instant.naive_utc() + Duration::hours(PROVIDER_UTC_OFFSET_HOURS);
        Self(local.format(TIMESTAMP_FORMAT).to_string())
    }

    /// The 14-digit string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `base64(shortcode || passkey || timestamp)`, no delimiters.
#[must_use]
pub fn password(shortcode: &str, passkey: &str, timestamp: &Timestamp) -> String {
    STANDARD.encode(format!("{shortcode}{passkey}{timestamp}"))
}

/// A payment the user asked for in one conversation turn.
///
/// Never persisted; after submission it survives only as the correlation id
/// inside the callback URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Payer's number; receives the prompt.
    pub phone: PhoneNumber,
    /// Amount to charge.
    pub amount: Amount,
    /// Binds the eventual callback to this turn.
    pub correlation_id: CorrelationId,
}

/// Body of `POST /mpesa/stkpush/v1/processrequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkPushRequest {
    /// Paybill or till number.
    pub business_short_code: String,
    /// See [`password`].
    pub password: String,
    /// Timestamp the password was derived from.
    pub timestamp: String,
    /// Always [`TRANSACTION_TYPE`].
    pub transaction_type: String,
    /// Whole shillings.
    pub amount: u32,
    /// Debited party.
    pub party_a: String,
    /// Credited party, the shortcode.
    pub party_b: String,
    /// Number that receives the prompt.
    pub phone_number: String,
    /// Where the provider posts the result.
    #[serde(rename = "CallBackURL")]
    pub callback_url: String,
    /// Shown to the payer.
    pub account_reference: String,
    /// Free-form description.
    pub transaction_desc: String,
}

/// Merchant settings needed to encode push requests.
#[derive(Debug, Clone)]
pub struct StkPushEncoder {
    shortcode: String,
    passkey: String,
    callback_base_url: String,
    account_reference: String,
    transaction_desc: String,
}

impl StkPushEncoder {
    /// Create an encoder for one merchant.
    pub fn new(
        shortcode: impl Into<String>,
        passkey: impl Into<String>,
        callback_base_url: impl Into<String>,
        account_reference: impl Into<String>,
        transaction_desc: impl Into<String>,
    ) -> Self {
        Self {
            shortcode: shortcode.into(),
            passkey: passkey.into(),
            callback_base_url: callback_base_url.into().trim_end_matches('/').to_string(),
            account_reference: account_reference.into(),
            transaction_desc: transaction_desc.into(),
        }
    }

    /// The callback address carrying `correlation_id`.
    #[must_use]
    pub fn callback_url(&self, correlation_id: &CorrelationId) -> String {
        format!("{}{CALLBACK_PATH}/{correlation_id}", self.callback_base_url)
    }

    /// Build the request body for `request`, signed with `timestamp`.
    #[must_use]
    pub fn encode(&self, request: &PaymentRequest, timestamp: &Timestamp) -> StkPushRequest {
        StkPushRequest {
            business_short_code: self.shortcode.clone(),
            password: password(&self.shortcode, &self.passkey, timestamp),
            timestamp: timestamp.as_str().to_string(),
            transaction_type: TRANSACTION_TYPE.to_string(),
            amount: request.amount.get(),
            party_a: request.phone.as_str().to_string(),
            party_b: self.shortcode.clone(),
            phone_number: request.phone.as_str().to_string(),
            callback_url: self.callback_url(&request.correlation_id),
            account_reference: self.account_reference.clone(),
            transaction_desc: self.transaction_desc.clone(),
        }
    }
}
