//! STK Push result callbacks.
//!
//! The provider posts the outcome of a push request to the callback URL some
//! time after the synchronous acknowledgment. Each callback resolves to
//! exactly one of two outcomes, paid or failed, and one chat message.

use serde::Deserialize;

use crate::ids::CorrelationId;

/// `ResultCode` the provider uses for a completed payment.
pub const SUCCESS_RESULT_CODE: i64 = 0;

/// Metadata item holding the M-Pesa receipt.
pub const RECEIPT_ITEM_NAME: &str = "MpesaReceiptNumber";

const PAYMENT_FAILED: &str = "❌ Payment failed or cancelled.";
const SESSION_BOOKED: &str = "🎉 Therapy session booked. A therapist will contact you shortly.";

/// Callback payload (`{"Body": {"stkCallback": {...}}}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallbackEnvelope {
    /// Payload body.
    pub body: CallbackBody,
}

/// Callback body container.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackBody {
    /// The STK result.
    #[serde(rename = "stkCallback")]
    pub stk_callback: StkCallback,
}

/// The STK result itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkCallback {
    /// Merchant request id from the acknowledgment.
    #[serde(rename = "MerchantRequestID", default)]
    pub merchant_request_id: Option<String>,
    /// Checkout request id from the acknowledgment.
    #[serde(rename = "CheckoutRequestID", default)]
    pub checkout_request_id: Option<String>,
    /// Zero on success.
    pub result_code: i64,
    /// Human-readable result.
    #[serde(default)]
    pub result_desc: Option<String>,
    /// Present on successful payments.
    #[serde(default)]
    pub callback_metadata: Option<CallbackMetadata>,
}

/// Keyed list of result values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallbackMetadata {
    /// Name/value pairs.
    #[serde(default)]
    pub item: Vec<MetadataItem>,
}

/// One name/value pair. Values are strings or numbers, or absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetadataItem {
    /// Item key.
    pub name: String,
    /// Item value.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl StkCallback {
    /// Look up the receipt number among the metadata items.
    #[must_use]
    pub fn receipt_number(&self) -> Option<String> {
        let item = self
            .callback_metadata
            .as_ref()?
            .item
            .iter()
            .find(|item| item.name == RECEIPT_ITEM_NAME)?;

        match item.value.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// A decoded callback, bound to the conversation through its correlation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackNotification {
    /// Provider result code.
    pub result_code: i64,
    /// Receipt, when the provider reported one.
    pub receipt_number: Option<String>,
    /// Taken from the callback path; not checked against anything.
    pub correlation_id: CorrelationId,
    /// Provider checkout id, for logs.
    pub checkout_request_id: Option<String>,
}

impl CallbackNotification {
    /// Bind an already-decoded envelope to `correlation_id`.
    #[must_use]
    pub fn from_envelope(envelope: CallbackEnvelope, correlation_id: CorrelationId) -> Self {
        let callback = envelope.body.stk_callback;
        Self {
            result_code: callback.result_code,
            receipt_number: callback.receipt_number(),
            correlation_id,
            checkout_request_id: callback.checkout_request_id,
        }
    }

    /// Decode a raw callback body.
    pub fn decode(
        body: &[u8],
        correlation_id: CorrelationId,
    ) -> Result<Self, serde_json::Error> {
        let envelope: CallbackEnvelope = serde_json::from_slice(body)?;
        Ok(Self::from_envelope(envelope, correlation_id))
    }

    /// Resolve to one of the two terminal outcomes.
    #[must_use]
    pub fn outcome(&self) -> PaymentOutcome {
        if self.result_code == SUCCESS_RESULT_CODE {
            PaymentOutcome::Paid {
                receipt: self.receipt_number.clone(),
            }
        } else {
            PaymentOutcome::Failed
        }
    }
}

/// Terminal result of one callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment completed. The receipt is omitted from the message if missing.
    Paid {
        /// M-Pesa receipt number.
        receipt: Option<String>,
    },
    /// Cancelled, timed out, insufficient funds, or an unreadable callback.
    Failed,
}

impl PaymentOutcome {
    /// The chat message announcing this outcome.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Paid {
                receipt: Some(receipt),
            } => format!("✅ Payment received. Receipt: {receipt}\n\n{SESSION_BOOKED}"),
            Self::Paid { receipt: None } => format!("✅ Payment received.\n\n{SESSION_BOOKED}"),
            Self::Failed => PAYMENT_FAILED.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ChatId;
    use serde_json::json;

    fn correlation() -> CorrelationId {
        CorrelationId::for_chat(ChatId::new(99))
    }

    fn decode(body: &serde_json::Value) -> CallbackNotification {
        CallbackNotification::decode(body.to_string().as_bytes(), correlation()).unwrap()
    }

    #[test]
    fn successful_callback_carries_receipt() {
        let body = json!({
            "Body": {
                "stkCallback": {
                    "MerchantRequestID": "29115-34620561-1",
                    "CheckoutRequestID": "ws_CO_191220191020363925",
                    "ResultCode": 0,
                    "ResultDesc": "The service request is processed successfully.",
                    "CallbackMetadata": {
                        "Item": [
                            { "Name": "Amount", "Value": 100.00 },
                            { "Name": "MpesaReceiptNumber", "Value": "NLJ7RT61SV" },
                            { "Name": "Balance" },
                            { "Name": "TransactionDate", "Value": 20191219102115_i64 },
                            { "Name": "PhoneNumber", "Value": 254708374149_i64 }
                        ]
                    }
                }
            }
        });

        let notification = decode(&body);
        assert_eq!(notification.receipt_number.as_deref(), Some("NLJ7RT61SV"));
        assert_eq!(
            notification.checkout_request_id.as_deref(),
            Some("ws_CO_191220191020363925")
        );

        let outcome = notification.outcome();
        assert_eq!(
            outcome,
            PaymentOutcome::Paid {
                receipt: Some("NLJ7RT61SV".into())
            }
        );
        assert!(outcome.message().contains("NLJ7RT61SV"));
    }

    #[test]
    fn success_without_receipt_item_omits_receipt() {
        let body = json!({
            "Body": { "stkCallback": {
                "ResultCode": 0,
                "CallbackMetadata": { "Item": [ { "Name": "Amount", "Value": 100 } ] }
            } }
        });

        let outcome = decode(&body).outcome();
        assert_eq!(outcome, PaymentOutcome::Paid { receipt: None });

        let message = outcome.message();
        assert!(message.starts_with("✅ Payment received."));
        assert!(!message.contains("Receipt"));
    }

    #[test]
    fn success_without_metadata_omits_receipt() {
        let body = json!({ "Body": { "stkCallback": { "ResultCode": 0 } } });
        assert_eq!(decode(&body).outcome(), PaymentOutcome::Paid { receipt: None });
    }

    #[test]
    fn nonzero_result_is_generic_failure() {
        for code in [1, 1032, 1037, 2001, -1] {
            let body = json!({
                "Body": { "stkCallback": {
                    "ResultCode": code,
                    "ResultDesc": "Request cancelled by user"
                } }
            });
            let outcome = decode(&body).outcome();
            assert_eq!(outcome, PaymentOutcome::Failed);
            assert_eq!(outcome.message(), "❌ Payment failed or cancelled.");
        }
    }

    #[test]
    fn numeric_receipt_value_is_stringified() {
        let body = json!({
            "Body": { "stkCallback": {
                "ResultCode": 0,
                "CallbackMetadata": { "Item": [ { "Name": "MpesaReceiptNumber", "Value": 12345 } ] }
            } }
        });
        assert_eq!(decode(&body).receipt_number.as_deref(), Some("12345"));
    }

    #[test]
    fn malformed_callback_fails_to_decode() {
        assert!(CallbackNotification::decode(b"{}", correlation()).is_err());
        assert!(CallbackNotification::decode(b"not json", correlation()).is_err());
        let missing_code = json!({ "Body": { "stkCallback": {} } });
        assert!(
            CallbackNotification::decode(missing_code.to_string().as_bytes(), correlation())
                .is_err()
        );
    }
}
