//! Extraction API integration tests.
//!
//! Tests verify:
//! - The envelope distinguishes success, empty result, and failure
//! - Engine failures answer with HTTP 200 and the failure message
//! - Mix disambiguation and live identifier validation short-circuit
//!   before the engine is reached
//! - Dual-platform route pairs behave identically
//! - Malformed request bodies are rejected at the schema layer

use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use serde_json::json;

use super::test_utils::{post_json, test_router, StubExtractor, TEST_TOKEN};

// =============================================================================
// Share
// =============================================================================

#[tokio::test]
async fn test_share_resolves_to_url() {
    let stub = StubExtractor::new().with_resolved_url("https://www.douyin.com/video/7000");
    let router = test_router(stub, TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/share",
        Some(TEST_TOKEN),
        json!({"text": "watch this https://v.douyin.com/abc/ now"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");
    assert_eq!(body["data"], "https://www.douyin.com/video/7000");
}

#[tokio::test]
async fn test_share_without_resolvable_url_fails() {
    let router = test_router(StubExtractor::new(), TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/tiktok/share",
        Some(TEST_TOKEN),
        json!({"text": "no link here"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "failed");
    assert!(body["data"].is_null());
}

// =============================================================================
// Detail
// =============================================================================

#[tokio::test]
async fn test_detail_returns_single_record() {
    let stub = StubExtractor::new().with_records(vec![json!({"id": "7000", "desc": "clip"})]);
    let router = test_router(stub, TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/detail",
        Some(TEST_TOKEN),
        json!({"detail_id": "7000"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");
    assert_eq!(body["data"]["id"], "7000");
    assert_eq!(body["params"]["detail_id"], "7000");
}

#[tokio::test]
async fn test_detail_unknown_id_is_empty_result() {
    let router = test_router(StubExtractor::new(), TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/detail",
        Some(TEST_TOKEN),
        json!({"detail_id": "7000"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "empty result");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_detail_engine_failure_is_http_200() {
    let router = test_router(StubExtractor::new().failing(), TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/tiktok/detail",
        Some(TEST_TOKEN),
        json!({"detail_id": "7000"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "failed");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_detail_missing_required_field_rejected() {
    let stub = StubExtractor::new();
    let calls = stub.call_counter();
    let router = test_router(stub, TEST_TOKEN);

    let (status, _) = post_json(&router, "/douyin/detail", Some(TEST_TOKEN), json!({})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Account
// =============================================================================

#[tokio::test]
async fn test_account_returns_record_list() {
    let stub = StubExtractor::new().with_records(vec![json!({"id": "1"}), json!({"id": "2"})]);
    let router = test_router(stub, TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/account",
        Some(TEST_TOKEN),
        json!({"sec_user_id": "MS4wLjAB", "tab": "post"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

// =============================================================================
// Mix
// =============================================================================

#[tokio::test]
async fn test_mix_by_collection_id() {
    let stub = StubExtractor::new().with_records(vec![json!({"id": "1"})]);
    let router = test_router(stub, TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/mix",
        Some(TEST_TOKEN),
        json!({"mix_id": "73000"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");
}

#[tokio::test]
async fn test_mix_with_both_ids_is_invalid() {
    let stub = StubExtractor::new().with_records(vec![json!({"id": "1"})]);
    let calls = stub.call_counter();
    let router = test_router(stub, TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/mix",
        Some(TEST_TOKEN),
        json!({"mix_id": "73000", "detail_id": "7000"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "parameters invalid");
    assert!(body["data"].is_null());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_mix_with_neither_id_is_invalid() {
    let router = test_router(StubExtractor::new(), TEST_TOKEN);

    let (status, body) = post_json(&router, "/tiktok/mix", Some(TEST_TOKEN), json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "parameters invalid");
}

#[tokio::test]
async fn test_mix_empty_string_id_counts_as_absent() {
    let stub = StubExtractor::new().with_records(vec![json!({"id": "1"})]);
    let router = test_router(stub, TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/mix",
        Some(TEST_TOKEN),
        json!({"mix_id": "73000", "detail_id": ""}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");
}

// =============================================================================
// Live
// =============================================================================

#[tokio::test]
async fn test_douyin_live_requires_web_rid() {
    let stub = StubExtractor::new().with_live_record(json!({"room": "on air"}));
    let router = test_router(stub, TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/live",
        Some(TEST_TOKEN),
        json!({"web_rid": "168465"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");
    assert_eq!(body["data"]["room"], "on air");

    // A room_id alone does not satisfy the douyin variant.
    let (status, body) = post_json(
        &router,
        "/douyin/live",
        Some(TEST_TOKEN),
        json!({"room_id": "7000"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "parameters invalid");
}

#[tokio::test]
async fn test_tiktok_live_requires_room_id() {
    let stub = StubExtractor::new().with_live_record(json!({"room": "on air"}));
    let router = test_router(stub, TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/tiktok/live",
        Some(TEST_TOKEN),
        json!({"room_id": "7000"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");

    let (status, body) = post_json(
        &router,
        "/tiktok/live",
        Some(TEST_TOKEN),
        json!({"web_rid": "168465"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "parameters invalid");
}

#[tokio::test]
async fn test_live_room_offline_is_empty_result() {
    let router = test_router(StubExtractor::new(), TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/live",
        Some(TEST_TOKEN),
        json!({"web_rid": "168465"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "empty result");
}

// =============================================================================
// Comments and Replies
// =============================================================================

#[tokio::test]
async fn test_comment_thread() {
    let stub = StubExtractor::new().with_records(vec![json!({"cid": "1", "text": "first"})]);
    let router = test_router(stub, TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/comment",
        Some(TEST_TOKEN),
        json!({"detail_id": "7000"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");
    assert_eq!(body["data"][0]["cid"], "1");
}

#[tokio::test]
async fn test_reply_requires_comment_id() {
    let stub = StubExtractor::new().with_records(vec![json!({"cid": "2"})]);
    let router = test_router(stub, TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/reply",
        Some(TEST_TOKEN),
        json!({"detail_id": "7000", "comment_id": "1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");

    let (status, _) = post_json(
        &router,
        "/douyin/reply",
        Some(TEST_TOKEN),
        json!({"detail_id": "7000"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_with_results() {
    let stub = StubExtractor::new().with_records(vec![json!({"id": "1"})]);
    let router = test_router(stub, TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/search/general",
        Some(TEST_TOKEN),
        json!({"keyword": "cats"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");
    assert_eq!(body["params"]["keyword"], "cats");
}

#[tokio::test]
async fn test_search_no_matches_is_empty_result() {
    let router = test_router(StubExtractor::new(), TEST_TOKEN);

    for path in [
        "/douyin/search/general",
        "/douyin/search/video",
        "/douyin/search/user",
        "/douyin/search/live",
    ] {
        let (status, body) =
            post_json(&router, path, Some(TEST_TOKEN), json!({"keyword": "nothing"})).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(body["message"], "empty result", "{path}");
    }
}

#[tokio::test]
async fn test_search_requires_keyword() {
    let router = test_router(StubExtractor::new(), TEST_TOKEN);

    let (status, _) =
        post_json(&router, "/douyin/search/video", Some(TEST_TOKEN), json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Engine Option Forwarding
// =============================================================================

#[tokio::test]
async fn test_search_forwards_source_cookie_proxy() {
    let stub = StubExtractor::new().with_records(vec![json!({"id": "1"})]);
    let seen = stub.seen_options();
    let router = test_router(stub, TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/douyin/search/general",
        Some(TEST_TOKEN),
        json!({"keyword": "cats", "source": true, "cookie": "c=1", "proxy": "http://p"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");

    let opts = seen.lock().unwrap().clone().expect("engine was not called");
    assert!(opts.raw);
    assert_eq!(opts.cookie.as_deref(), Some("c=1"));
    assert_eq!(opts.proxy.as_deref(), Some("http://p"));
}

#[tokio::test]
async fn test_detail_forwards_source_cookie_proxy() {
    let stub = StubExtractor::new().with_records(vec![json!({"id": "7000"})]);
    let seen = stub.seen_options();
    let router = test_router(stub, TEST_TOKEN);

    let (status, _) = post_json(
        &router,
        "/tiktok/detail",
        Some(TEST_TOKEN),
        json!({"detail_id": "7000", "source": true, "cookie": "tt=2", "proxy": "http://p"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);

    let opts = seen.lock().unwrap().clone().expect("engine was not called");
    assert!(opts.raw);
    assert_eq!(opts.cookie.as_deref(), Some("tt=2"));
    assert_eq!(opts.proxy.as_deref(), Some("http://p"));
}

#[tokio::test]
async fn test_options_default_when_fields_absent() {
    let stub = StubExtractor::new().with_records(vec![json!({"id": "1"})]);
    let seen = stub.seen_options();
    let router = test_router(stub, TEST_TOKEN);

    post_json(
        &router,
        "/douyin/search/video",
        Some(TEST_TOKEN),
        json!({"keyword": "dogs"}),
    )
    .await;

    let opts = seen.lock().unwrap().clone().expect("engine was not called");
    assert!(!opts.raw);
    assert!(opts.cookie.is_none());
    assert!(opts.proxy.is_none());
}

// =============================================================================
// Route Surface
// =============================================================================

#[tokio::test]
async fn test_unknown_route_is_404() {
    let router = test_router(StubExtractor::new(), TEST_TOKEN);

    let (status, _) = post_json(
        &router,
        "/douyin/unknown",
        Some(TEST_TOKEN),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_platform_pairs_share_behavior() {
    for path in ["/douyin/detail", "/tiktok/detail"] {
        let stub = StubExtractor::new().with_records(vec![json!({"id": "7000"})]);
        let router = test_router(stub, TEST_TOKEN);

        let (status, body) =
            post_json(&router, path, Some(TEST_TOKEN), json!({"detail_id": "7000"})).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(body["message"], "success", "{path}");
    }
}
