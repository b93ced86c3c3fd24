//! Token authentication integration tests.
//!
//! Tests verify:
//! - Guarded routes reject missing and wrong tokens with 403
//! - Rejected requests never reach the extraction engine
//! - The root identity route stays public
//! - An empty configured token disables the gate
//! - Token rotation through /settings takes effect immediately

use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use serde_json::json;

use super::test_utils::{get_json, post_json, test_router, StubExtractor, TEST_TOKEN};

// =============================================================================
// Rejections
// =============================================================================

#[tokio::test]
async fn test_missing_token_rejected() {
    let stub = StubExtractor::new().with_records(vec![json!({"id": 1})]);
    let calls = stub.call_counter();
    let router = test_router(stub, TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/detail",
        None,
        json!({"detail_id": "7000000000000000000"}),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "verification failed");
    assert!(body["data"].is_null());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_wrong_token_rejected() {
    let stub = StubExtractor::new().with_records(vec![json!({"id": 1})]);
    let calls = stub.call_counter();
    let router = test_router(stub, TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/detail",
        Some("not-the-token"),
        json!({"detail_id": "7000000000000000000"}),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "verification failed");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_token_probe_rejects_wrong_token() {
    let router = test_router(StubExtractor::new(), TEST_TOKEN);

    let (status, _) = get_json(&router, "/token", Some("wrong")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// =============================================================================
// Acceptance
// =============================================================================

#[tokio::test]
async fn test_token_probe_accepts_valid_token() {
    let router = test_router(StubExtractor::new(), TEST_TOKEN);

    let (status, body) = get_json(&router, "/token", Some(TEST_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "verified");
}

#[tokio::test]
async fn test_root_route_is_public() {
    let router = test_router(StubExtractor::new(), TEST_TOKEN);

    let (status, body) = get_json(&router, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "douk-gateway");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_empty_token_disables_gate() {
    let router = test_router(StubExtractor::new(), "");

    let (status, body) = get_json(&router, "/token", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "verified");
}

// =============================================================================
// Rotation
// =============================================================================

#[tokio::test]
async fn test_token_rotation_takes_effect_immediately() {
    let router = test_router(StubExtractor::new(), TEST_TOKEN);

    let (status, _) = post_json(
        &router,
        "/settings",
        Some(TEST_TOKEN),
        json!({"token": "rotated"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get_json(&router, "/token", Some(TEST_TOKEN)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = get_json(&router, "/token", Some("rotated")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "verified");
}
