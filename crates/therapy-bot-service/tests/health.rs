//! Health endpoint integration tests.

mod common;

use common::TestHarness;

#[tokio::test]
async fn health_check_returns_ok() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "therapy-bot");
}

#[tokio::test]
async fn health_reports_configured_providers() {
    let harness = TestHarness::new().await;

    let body: serde_json::Value = harness.server.get("/health").await.json();

    assert_eq!(body["providers"]["telegram"], true);
    assert_eq!(body["providers"]["mpesa"], true);
    assert_eq!(body["providers"]["openrouter"], true);
}

#[tokio::test]
async fn health_flags_missing_credentials_without_failing() {
    let server = TestHarness::server_with_default_config();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["providers"]["telegram"], false);
    assert_eq!(body["providers"]["mpesa"], false);
    assert_eq!(body["providers"]["openrouter"], false);
}
