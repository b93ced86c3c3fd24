//! Test utilities for integration tests.
//!
//! Provides a stub extraction engine with canned results and call tracking,
//! plus helpers for driving the router without a running server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use douk_gateway::config::{Settings, SettingsStore};
use douk_gateway::error::ExtractError;
use douk_gateway::extract::{
    AccountQuery, CommentQuery, Extractor, FetchOptions, Record, ReplyQuery, SearchJob,
};
use douk_gateway::platform::Platform;
use douk_gateway::server::{create_router, AppState, RouterConfig, TOKEN_HEADER};
use douk_gateway::validate::{LiveIdent, MixTarget};

pub const TEST_TOKEN: &str = "test-token";

// =============================================================================
// Stub Extractor with Call Tracking
// =============================================================================

/// A stub engine returning canned results and counting every call.
///
/// Call counting lets auth tests assert the engine is never reached on a
/// rejected request; the last received [`FetchOptions`] is kept so tests can
/// assert the per-request overrides actually reach the engine.
pub struct StubExtractor {
    call_count: Arc<AtomicUsize>,
    seen_options: Arc<Mutex<Option<FetchOptions>>>,
    records: Vec<Record>,
    live_record: Option<Record>,
    resolved_url: Option<String>,
    fail: bool,
}

impl StubExtractor {
    pub fn new() -> Self {
        Self {
            call_count: Arc::new(AtomicUsize::new(0)),
            seen_options: Arc::new(Mutex::new(None)),
            records: Vec::new(),
            live_record: None,
            resolved_url: None,
            fail: false,
        }
    }

    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    pub fn with_live_record(mut self, record: Record) -> Self {
        self.live_record = Some(record);
        self
    }

    pub fn with_resolved_url(mut self, url: impl Into<String>) -> Self {
        self.resolved_url = Some(url.into());
        self
    }

    /// Every operation fails with a network error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Handle to the call counter, usable after the stub moves into state.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }

    /// Handle to the last received engine options.
    pub fn seen_options(&self) -> Arc<Mutex<Option<FetchOptions>>> {
        Arc::clone(&self.seen_options)
    }

    fn track(&self) -> Result<(), ExtractError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(ExtractError::Network("stub failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn record_options(&self, opts: &FetchOptions) {
        *self.seen_options.lock().unwrap() = Some(opts.clone());
    }
}

#[async_trait]
impl Extractor for StubExtractor {
    async fn resolve_share(
        &self,
        _platform: Platform,
        _text: &str,
        _proxy: Option<&str>,
    ) -> Result<Option<String>, ExtractError> {
        self.track()?;
        Ok(self.resolved_url.clone())
    }

    async fn fetch_detail(
        &self,
        _platform: Platform,
        _ids: &[String],
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError> {
        self.record_options(opts);
        self.track()?;
        Ok(self.records.clone())
    }

    async fn fetch_account(
        &self,
        _platform: Platform,
        _query: &AccountQuery,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError> {
        self.record_options(opts);
        self.track()?;
        Ok(self.records.clone())
    }

    async fn fetch_collection(
        &self,
        _platform: Platform,
        _target: &MixTarget,
        _cursor: u64,
        _count: Option<u32>,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError> {
        self.record_options(opts);
        self.track()?;
        Ok(self.records.clone())
    }

    async fn fetch_live(
        &self,
        _platform: Platform,
        _ident: &LiveIdent,
        opts: &FetchOptions,
    ) -> Result<Option<Record>, ExtractError> {
        self.record_options(opts);
        self.track()?;
        Ok(self.live_record.clone())
    }

    async fn fetch_comments(
        &self,
        _query: &CommentQuery,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError> {
        self.record_options(opts);
        self.track()?;
        Ok(self.records.clone())
    }

    async fn fetch_replies(
        &self,
        _query: &ReplyQuery,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError> {
        self.record_options(opts);
        self.track()?;
        Ok(self.records.clone())
    }

    async fn search(
        &self,
        _job: &SearchJob,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError> {
        self.record_options(opts);
        self.track()?;
        Ok(self.records.clone())
    }
}

// =============================================================================
// Router and Request Helpers
// =============================================================================

/// A router over the stub engine with the given expected token.
pub fn test_router(stub: StubExtractor, token: &str) -> Router {
    let settings = Settings {
        token: token.to_string(),
        ..Settings::default()
    };
    test_router_with_settings(stub, settings)
}

/// A router over the stub engine with a full settings document.
pub fn test_router_with_settings(stub: StubExtractor, settings: Settings) -> Router {
    let store = SettingsStore::ephemeral(settings);
    let state = AppState::new(stub, store);
    create_router(state, RouterConfig::new().with_tracing(false))
}

/// POST a JSON body with the given token and return (status, parsed body).
pub async fn post_json(
    router: &Router,
    path: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(TOKEN_HEADER, token);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    send(router, request).await
}

/// GET with the given token and return (status, parsed body).
pub async fn get_json(router: &Router, path: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(token) = token {
        builder = builder.header(TOKEN_HEADER, token);
    }
    let request = builder.body(Body::empty()).unwrap();

    send(router, request).await
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}
