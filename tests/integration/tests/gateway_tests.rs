//! Gateway Integration Tests
//!
//! Each test starts its own gateway on an ephemeral port and drives it with
//! real WebSocket clients. No external services are needed.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::time::Duration;

use integration_tests::{events, paired, TestServer};
use pairchat_core::MAX_MESSAGE_LENGTH;
use reqwest::StatusCode;
use serde_json::json;

const QUIET: Duration = Duration::from_millis(200);

// ============================================================================
// Health / Stats
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_stats_reflect_queue_and_sessions() {
    let server = TestServer::start().await.unwrap();

    let (_a, _b) = paired(&server).await.unwrap();
    let mut c = server.connect().await.unwrap();
    c.call("startChat", None).await.unwrap();

    let stats = server.stats().await.unwrap();
    assert_eq!(stats["connections"], 3);
    assert_eq!(stats["waiting"], 1);
    assert_eq!(stats["sessions"], 1);
    assert!(stats["server_time"].is_string());
    assert!(stats["uptime"].is_u64());
}

// ============================================================================
// Connection
// ============================================================================

#[tokio::test]
async fn test_hello_announces_connection() {
    let server = TestServer::start().await.unwrap();
    let a = server.connect().await.unwrap();
    let b = server.connect().await.unwrap();

    assert!(!a.connection_id.is_empty());
    assert_ne!(a.connection_id, b.connection_id);
    assert_eq!(a.heartbeat_interval, 25_000);
}

// ============================================================================
// Pairing
// ============================================================================

#[tokio::test]
async fn test_first_client_waits() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    let frames = a.call("startChat", None).await.unwrap();
    assert_eq!(events(&frames), ["ack"]);
    a.expect_silence(QUIET).await.unwrap();
}

#[tokio::test]
async fn test_two_clients_are_paired() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    a.call("startChat", None).await.unwrap();
    let frames = b.call("startChat", None).await.unwrap();

    assert_eq!(events(&frames), ["chatStarted", "ack"]);
    a.expect_event("chatStarted").await.unwrap();
}

#[tokio::test]
async fn test_duplicate_start_keeps_one_queue_entry() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    a.call("startChat", None).await.unwrap();
    a.call("startChat", None).await.unwrap();

    let stats = server.stats().await.unwrap();
    assert_eq!(stats["waiting"], 1);
    assert_eq!(stats["sessions"], 0);
}

#[tokio::test]
async fn test_start_while_paired_is_ignored() {
    let server = TestServer::start().await.unwrap();
    let (mut a, mut b) = paired(&server).await.unwrap();

    let frames = a.call("startChat", None).await.unwrap();
    assert_eq!(events(&frames), ["ack"]);
    b.expect_silence(QUIET).await.unwrap();

    let stats = server.stats().await.unwrap();
    assert_eq!(stats["sessions"], 1);
    assert_eq!(stats["waiting"], 0);
}

#[tokio::test]
async fn test_chat_ready_announces_partner_to_both() {
    let server = TestServer::start().await.unwrap();
    let (mut a, mut b) = paired(&server).await.unwrap();

    let frames = a.call("chatReady", None).await.unwrap();
    assert_eq!(events(&frames), ["partner_found", "ack"]);
    b.expect_event("partner_found").await.unwrap();
}

#[tokio::test]
async fn test_chat_ready_without_session_is_silent() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    let frames = a.call("chatReady", None).await.unwrap();
    assert_eq!(events(&frames), ["ack"]);
}

// ============================================================================
// Messages
// ============================================================================

#[tokio::test]
async fn test_message_is_relayed_and_acknowledged() {
    let server = TestServer::start().await.unwrap();
    let (mut a, mut b) = paired(&server).await.unwrap();

    let frames = a
        .call(
            "message",
            Some(json!({ "text": "hello there", "timestamp": "2024-01-01T00:00:00Z", "mood": "ok" })),
        )
        .await
        .unwrap();
    assert_eq!(events(&frames), ["ack"]);
    assert_eq!(frames[0].data, json!({ "success": true }));

    let forwarded = b.expect_event("message").await.unwrap();
    assert_eq!(forwarded.data["text"], "hello there");
    assert_eq!(forwarded.data["timestamp"], "2024-01-01T00:00:00Z");
    assert_eq!(forwarded.data["mood"], "ok");

    a.expect_silence(QUIET).await.unwrap();
}

#[tokio::test]
async fn test_message_without_partner_fails() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    let frames = a.call("message", Some(json!({ "text": "anyone?" }))).await.unwrap();
    assert_eq!(frames[0].data, json!({ "error": "Partner not found" }));
}

#[tokio::test]
async fn test_invalid_messages_are_rejected() {
    let server = TestServer::start().await.unwrap();
    let (mut a, mut b) = paired(&server).await.unwrap();

    let too_long = "x".repeat(usize::try_from(MAX_MESSAGE_LENGTH).unwrap() + 1);
    for data in [json!({ "text": "" }), json!({ "text": too_long }), json!({ "body": "hi" }), json!("hi")] {
        let frames = a.call("message", Some(data)).await.unwrap();
        let error = frames[0].data["error"].as_str().unwrap();
        assert!(error.starts_with("Invalid message format"), "{error}");
    }

    b.expect_silence(QUIET).await.unwrap();
}

#[tokio::test]
async fn test_failure_without_ack_sends_error_event() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    a.emit("message", Some(json!({ "text": "nobody here" }))).await.unwrap();
    let error = a.expect_event("error").await.unwrap();
    assert_eq!(error.data, "Partner not found");
}

#[tokio::test]
async fn test_malformed_frames_keep_connection_open() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    a.send_raw("not json").await.unwrap();
    a.expect_event("error").await.unwrap();

    a.send_raw(r#"{"event":"selfDestruct"}"#).await.unwrap();
    a.expect_event("error").await.unwrap();

    // Server-only events are refused too
    a.emit("chatStarted", None).await.unwrap();
    a.expect_event("error").await.unwrap();

    let frames = a.call("startChat", None).await.unwrap();
    assert_eq!(events(&frames), ["ack"]);
}

// ============================================================================
// Typing
// ============================================================================

#[tokio::test]
async fn test_typing_reaches_partner_only() {
    let server = TestServer::start().await.unwrap();
    let (mut a, mut b) = paired(&server).await.unwrap();

    a.emit("typing", None).await.unwrap();
    b.expect_event("typing").await.unwrap();
    a.expect_silence(QUIET).await.unwrap();
}

#[tokio::test]
async fn test_typing_without_partner_is_dropped() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    let frames = a.call("typing", None).await.unwrap();
    assert_eq!(events(&frames), ["ack"]);
}

// ============================================================================
// Leaving and disconnecting
// ============================================================================

#[tokio::test]
async fn test_disconnect_notifies_partner_once() {
    let server = TestServer::start().await.unwrap();
    let (a, mut b) = paired(&server).await.unwrap();

    a.close().await.unwrap();
    b.expect_event("partner_disconnected").await.unwrap();
    b.expect_silence(QUIET).await.unwrap();

    let stats = server.stats().await.unwrap();
    assert_eq!(stats["sessions"], 0);
    assert_eq!(stats["waiting"], 0);
}

#[tokio::test]
async fn test_survivor_is_not_requeued_automatically() {
    let server = TestServer::start().await.unwrap();
    let (a, mut b) = paired(&server).await.unwrap();

    a.close().await.unwrap();
    b.expect_event("partner_disconnected").await.unwrap();

    let frames = b.call("message", Some(json!({ "text": "still there?" }))).await.unwrap();
    assert_eq!(frames[0].data, json!({ "error": "Partner not found" }));

    b.call("startChat", None).await.unwrap();
    assert_eq!(server.stats().await.unwrap()["waiting"], 1);
}

#[tokio::test]
async fn test_survivor_pairs_with_waiting_third_client() {
    let server = TestServer::start().await.unwrap();
    let (a, mut b) = paired(&server).await.unwrap();
    let mut c = server.connect().await.unwrap();
    c.call("startChat", None).await.unwrap();

    a.close().await.unwrap();
    b.expect_event("partner_disconnected").await.unwrap();

    let frames = b.call("startChat", None).await.unwrap();
    assert_eq!(events(&frames), ["chatStarted", "ack"]);
    c.expect_event("chatStarted").await.unwrap();

    b.call("message", Some(json!({ "text": "hi c" }))).await.unwrap();
    assert_eq!(c.expect_event("message").await.unwrap().data["text"], "hi c");
}

#[tokio::test]
async fn test_waiting_client_disconnect_leaves_queue() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    a.call("startChat", None).await.unwrap();

    a.close().await.unwrap();
    server.wait_for_connections(0).await.unwrap();

    // The next client must not be paired with the departed one
    let mut b = server.connect().await.unwrap();
    let frames = b.call("startChat", None).await.unwrap();
    assert_eq!(events(&frames), ["ack"]);
    b.expect_silence(QUIET).await.unwrap();
}

#[tokio::test]
async fn test_leave_chat_ends_session() {
    let server = TestServer::start().await.unwrap();
    let (mut a, mut b) = paired(&server).await.unwrap();

    let frames = a.call("leaveChat", None).await.unwrap();
    assert_eq!(events(&frames), ["ack"]);
    b.expect_event("partner_disconnected").await.unwrap();

    let frames = a.call("message", Some(json!({ "text": "bye" }))).await.unwrap();
    assert_eq!(frames[0].data, json!({ "error": "Partner not found" }));
    assert_eq!(server.stats().await.unwrap()["sessions"], 0);
}

#[tokio::test]
async fn test_leave_chat_while_waiting_dequeues() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    a.call("startChat", None).await.unwrap();
    a.call("leaveChat", None).await.unwrap();

    assert_eq!(server.stats().await.unwrap()["waiting"], 0);
}
