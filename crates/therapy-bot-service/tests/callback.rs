//! M-Pesa callback integration tests.

mod common;

use serde_json::json;

use common::{stk_callback, TestHarness, CALLBACK_BASE_URL};

const CHAT_ID: i64 = 987_654;

fn callback_path(correlation: &str) -> String {
    format!("/mpesa/callback/{correlation}")
}

fn receipt_items() -> serde_json::Value {
    json!([
        { "Name": "Amount", "Value": 100.0 },
        { "Name": "MpesaReceiptNumber", "Value": "NLJ7RT61SV" },
        { "Name": "TransactionDate", "Value": 20_191_219_102_115_i64 },
        { "Name": "PhoneNumber", "Value": 254_712_345_678_i64 }
    ])
}

#[tokio::test]
async fn success_callback_reports_receipt() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post(&callback_path(&format!("{CHAT_ID}.0b8e3f0c7f7a4a0f9a4d1f5f5b0b6c2e")))
        .json(&stk_callback(0, Some(receipt_items())))
        .await;

    response.assert_status_ok();

    let sent = harness.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, CHAT_ID);
    assert!(sent[0].text.contains("Payment received"));
    assert!(sent[0].text.contains("NLJ7RT61SV"));
    assert!(sent[0].text.contains("Therapy session booked"));
}

#[tokio::test]
async fn success_without_receipt_item_omits_receipt() {
    let harness = TestHarness::new().await;

    harness
        .server
        .post(&callback_path(&CHAT_ID.to_string()))
        .json(&stk_callback(0, Some(json!([{ "Name": "Amount", "Value": 100 }]))))
        .await
        .assert_status_ok();

    let sent = harness.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text.contains("Payment received"));
    assert!(!sent[0].text.contains("Receipt"));
}

#[tokio::test]
async fn success_without_metadata_omits_receipt() {
    let harness = TestHarness::new().await;

    harness
        .server
        .post(&callback_path(&CHAT_ID.to_string()))
        .json(&stk_callback(0, None))
        .await
        .assert_status_ok();

    let sent = harness.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text.contains("Payment received"));
}

#[tokio::test]
async fn nonzero_result_reports_generic_failure() {
    let harness = TestHarness::new().await;

    harness
        .server
        .post(&callback_path(&CHAT_ID.to_string()))
        .json(&stk_callback(1032, None))
        .await
        .assert_status_ok();

    let sent = harness.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "❌ Payment failed or cancelled.");
}

#[tokio::test]
async fn callback_is_always_acknowledged_with_daraja_body() {
    let harness = TestHarness::new().await;

    let cases = [
        (callback_path(&CHAT_ID.to_string()), stk_callback(0, Some(receipt_items()))),
        (callback_path(&CHAT_ID.to_string()), stk_callback(1, None)),
        (callback_path(&CHAT_ID.to_string()), json!({ "unexpected": true })),
        (callback_path("not-a-chat"), stk_callback(0, None)),
    ];

    for (path, body) in cases {
        let response = harness.server.post(&path).json(&body).await;
        response.assert_status_ok();
        response.assert_json(&json!({ "ResultCode": 0, "ResultDesc": "Accepted" }));
    }
}

#[tokio::test]
async fn malformed_callback_reports_failure() {
    let harness = TestHarness::new().await;

    harness
        .server
        .post(&callback_path(&CHAT_ID.to_string()))
        .text("<html>oops</html>")
        .await
        .assert_status_ok();

    let sent = harness.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "❌ Payment failed or cancelled.");
}

#[tokio::test]
async fn oversized_callback_is_acknowledged_and_reported_as_failure() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post(&callback_path(&CHAT_ID.to_string()))
        .text(TestHarness::oversized_body())
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "ResultCode": 0, "ResultDesc": "Accepted" }));

    let sent = harness.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "❌ Payment failed or cancelled.");
}

#[tokio::test]
async fn unparseable_correlation_id_sends_nothing() {
    let harness = TestHarness::new().await;

    harness
        .server
        .post(&callback_path("chat-without-id"))
        .json(&stk_callback(0, Some(receipt_items())))
        .await
        .assert_status_ok();

    assert!(harness.sent_messages().await.is_empty());
}

#[tokio::test]
async fn delivery_failure_still_acknowledges_callback() {
    let harness = TestHarness::with_telegram_status(403).await;

    let response = harness
        .server
        .post(&callback_path(&CHAT_ID.to_string()))
        .json(&stk_callback(0, Some(receipt_items())))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "ResultCode": 0, "ResultDesc": "Accepted" }));
}

#[tokio::test]
async fn duplicate_callbacks_are_each_relayed() {
    let harness = TestHarness::new().await;

    for _ in 0..2 {
        harness
            .server
            .post(&callback_path(&CHAT_ID.to_string()))
            .json(&stk_callback(0, Some(receipt_items())))
            .await
            .assert_status_ok();
    }

    // No record of outstanding requests, so both are treated as genuine.
    assert_eq!(harness.sent_messages().await.len(), 2);
}

#[tokio::test]
async fn payment_round_trip_reaches_paying_chat() {
    let harness = TestHarness::new().await;
    harness.mount_token_ok().await;
    harness.mount_stk_accepted().await;

    harness
        .server
        .post(&TestHarness::webhook_path())
        .json(&TestHarness::text_update(CHAT_ID, "254712345678"))
        .await
        .assert_status_ok();

    let pushes = harness.stk_requests().await;
    let callback_url = pushes[0]["CallBackURL"].as_str().unwrap();
    let path = callback_url.strip_prefix(CALLBACK_BASE_URL).unwrap();

    harness
        .server
        .post(path)
        .json(&stk_callback(0, Some(receipt_items())))
        .await
        .assert_status_ok();

    let sent = harness.sent_messages().await;
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|m| m.chat_id == CHAT_ID));
    assert!(sent[0].text.contains("Initiating M-Pesa payment"));
    assert!(sent[1].text.contains("NLJ7RT61SV"));
}
