//! Common test utilities for therapy bot integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use axum_test::TestServer;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use therapy_bot_service::{create_router, AppState, MpesaConfig, ServiceConfig};

/// Bot token; also the webhook path secret.
pub const BOT_TOKEN: &str = "123456:TEST-TOKEN";

/// Public base URL the callback URLs are built from.
pub const CALLBACK_BASE_URL: &str = "https://bot.example.com";

/// Test harness: the service plus stand-ins for every provider it calls.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Telegram Bot API stand-in.
    pub telegram: MockServer,
    /// Daraja stand-in.
    pub mpesa: MockServer,
    /// `OpenRouter` stand-in.
    pub openrouter: MockServer,
}

/// A message the bot sent to Telegram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
}

impl TestHarness {
    /// Harness whose Telegram stand-in accepts every message.
    pub async fn new() -> Self {
        Self::with_telegram_status(200).await
    }

    /// Harness whose Telegram stand-in answers `sendMessage` with `status`.
    pub async fn with_telegram_status(status: u16) -> Self {
        let telegram = MockServer::start().await;
        let mpesa = MockServer::start().await;
        let openrouter = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/bot{BOT_TOKEN}/sendMessage")))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "ok": status == 200,
                "result": {}
            })))
            .mount(&telegram)
            .await;

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            telegram_token: BOT_TOKEN.into(),
            telegram_api_url: telegram.uri(),
            openrouter_api_key: "or-test-key".into(),
            openrouter_api_url: openrouter.uri(),
            openrouter_model: "test/model".into(),
            mpesa: MpesaConfig {
                consumer_key: "consumer-key".into(),
                consumer_secret: "consumer-secret".into(),
                shortcode: "174379".into(),
                passkey: "test-passkey".into(),
                api_url: mpesa.uri(),
                callback_base_url: CALLBACK_BASE_URL.into(),
                ..MpesaConfig::default()
            },
            http_timeout_seconds: 5,
            ..ServiceConfig::default()
        };

        let state = AppState::new(config).expect("Failed to build app state");
        let server = TestServer::new(create_router(state)).expect("Failed to create test server");

        Self {
            server,
            telegram,
            mpesa,
            openrouter,
        }
    }

    /// A bare server built from `ServiceConfig::default()`, with no credentials.
    pub fn server_with_default_config() -> TestServer {
        let state = AppState::new(ServiceConfig::default()).expect("Failed to build app state");
        TestServer::new(create_router(state)).expect("Failed to create test server")
    }

    /// A body one byte over the default request size limit.
    pub fn oversized_body() -> String {
        "x".repeat(ServiceConfig::default().max_body_bytes + 1)
    }

    /// Path of the Telegram webhook.
    pub fn webhook_path() -> String {
        format!("/webhook/{BOT_TOKEN}")
    }

    /// A Telegram update carrying a text message.
    pub fn text_update(chat_id: i64, text: &str) -> serde_json::Value {
        json!({
            "update_id": 10_000,
            "message": {
                "message_id": 1,
                "chat": { "id": chat_id, "type": "private" },
                "date": 1_700_000_000,
                "text": text
            }
        })
    }

    /// Make the Daraja stand-in issue tokens.
    pub async fn mount_token_ok(&self) {
        Mock::given(method("GET"))
            .and(path("/oauth/v1/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "daraja-token",
                "expires_in": "3599"
            })))
            .mount(&self.mpesa)
            .await;
    }

    /// Make the Daraja stand-in accept STK pushes.
    pub async fn mount_stk_accepted(&self) {
        Mock::given(method("POST"))
            .and(path("/mpesa/stkpush/v1/processrequest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MerchantRequestID": "29115-34620561-1",
                "CheckoutRequestID": "ws_CO_191220191020363925",
                "ResponseCode": "0",
                "ResponseDescription": "Success. Request accepted for processing",
                "CustomerMessage": "Success. Request accepted for processing"
            })))
            .mount(&self.mpesa)
            .await;
    }

    /// Messages the bot sent, in order.
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.telegram
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path().ends_with("/sendMessage"))
            .map(|r| {
                let body: serde_json::Value =
                    serde_json::from_slice(&r.body).expect("sendMessage body is JSON");
                SentMessage {
                    chat_id: body["chat_id"].as_i64().expect("chat_id is an integer"),
                    text: body["text"].as_str().expect("text is a string").to_string(),
                }
            })
            .collect()
    }

    /// STK push bodies the bot submitted, in order.
    pub async fn stk_requests(&self) -> Vec<serde_json::Value> {
        self.mpesa
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == "/mpesa/stkpush/v1/processrequest")
            .map(|r| serde_json::from_slice(&r.body).expect("STK body is JSON"))
            .collect()
    }

    /// Number of requests the `OpenRouter` stand-in received.
    pub async fn ai_request_count(&self) -> usize {
        self.openrouter
            .received_requests()
            .await
            .unwrap_or_default()
            .len()
    }
}

/// A Daraja STK callback body.
pub fn stk_callback(result_code: i64, items: Option<serde_json::Value>) -> serde_json::Value {
    let mut callback = json!({
        "MerchantRequestID": "29115-34620561-1",
        "CheckoutRequestID": "ws_CO_191220191020363925",
        "ResultCode": result_code,
        "ResultDesc": if result_code == 0 {
            "The service request is processed successfully."
        } else {
            "Request cancelled by user"
        }
    });

    if let Some(items) = items {
        callback["CallbackMetadata"] = json!({ "Item": items });
    }

    json!({ "Body": { "stkCallback": callback } })
}
