//! Settings document integration tests.
//!
//! Tests verify:
//! - GET returns the full document
//! - POST merges partial updates and answers with the full document
//! - Untouched fields survive a partial update
//! - The settings routes sit behind the auth gate

use axum::http::StatusCode;
use serde_json::json;

use douk_gateway::config::Settings;

use super::test_utils::{
    get_json, post_json, test_router, test_router_with_settings, StubExtractor, TEST_TOKEN,
};

#[tokio::test]
async fn test_get_settings_returns_full_document() {
    let settings = Settings {
        token: TEST_TOKEN.to_string(),
        cookie: "session=abc".to_string(),
        ..Settings::default()
    };
    let router = test_router_with_settings(StubExtractor::new(), settings);

    let (status, body) = get_json(&router, "/settings", Some(TEST_TOKEN)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], TEST_TOKEN);
    assert_eq!(body["cookie"], "session=abc");
    assert_eq!(body["port"], 5555);
    assert_eq!(body["proxy"], "");
}

#[tokio::test]
async fn test_partial_update_merges_and_returns_full_document() {
    let router = test_router(StubExtractor::new(), TEST_TOKEN);

    let (status, body) = post_json(
        &router,
        "/settings",
        Some(TEST_TOKEN),
        json!({"cookie_tiktok": "tt=1", "timeout": 30}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cookie_tiktok"], "tt=1");
    assert_eq!(body["timeout"], 30);
    // Untouched fields keep their values.
    assert_eq!(body["token"], TEST_TOKEN);
    assert_eq!(body["port"], 5555);
}

#[tokio::test]
async fn test_update_visible_on_subsequent_read() {
    let router = test_router(StubExtractor::new(), TEST_TOKEN);

    post_json(
        &router,
        "/settings",
        Some(TEST_TOKEN),
        json!({"proxy": "http://127.0.0.1:7890"}),
    )
    .await;

    let (_, body) = get_json(&router, "/settings", Some(TEST_TOKEN)).await;
    assert_eq!(body["proxy"], "http://127.0.0.1:7890");
}

#[tokio::test]
async fn test_settings_routes_are_guarded() {
    let router = test_router(StubExtractor::new(), TEST_TOKEN);

    let (status, _) = get_json(&router, "/settings", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = post_json(&router, "/settings", None, json!({"timeout": 1})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
