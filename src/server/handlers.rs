//! HTTP request handlers for the gateway API.
//!
//! Every data handler follows the same shape: validate the schema-parsed
//! request, hand the normalized parameters to the extraction engine, and map
//! the tagged result onto the response envelope. Business outcomes always use
//! HTTP 200; the envelope message carries the actual result.
//!
//! # Endpoints
//!
//! - `GET /` - Service identity, the only unguarded route
//! - `GET /token` - Token probe
//! - `GET /settings` / `POST /settings` - Settings document access
//! - `POST /{platform}/share` ... - Extraction operations (see routes)

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::config::{Settings, SettingsStore, SettingsUpdate};
use crate::envelope::{params_of, Envelope};
use crate::error::{ExtractError, SettingsError};
use crate::extract::{AccountQuery, CommentQuery, Extractor, FetchOptions, Record, ReplyQuery};
use crate::platform::Platform;
use crate::schemas::{
    Account, Comment, Detail, GeneralSearch, IntoSearchJob, Live, LiveSearch, Mix, Reply,
    ShareLink, UserSearch, VideoSearch,
};
use crate::validate::{cursor_or_start, live_identifier, resolve_mix};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state handed to every handler.
pub struct AppState<E: Extractor> {
    /// The extraction engine
    pub extractor: Arc<E>,

    /// The runtime settings document
    pub settings: Arc<SettingsStore>,
}

impl<E: Extractor> AppState<E> {
    pub fn new(extractor: E, settings: Arc<SettingsStore>) -> Self {
        Self {
            extractor: Arc::new(extractor),
            settings,
        }
    }
}

impl<E: Extractor> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            extractor: Arc::clone(&self.extractor),
            settings: Arc::clone(&self.settings),
        }
    }
}

// =============================================================================
// Service Routes
// =============================================================================

/// Response body for the root identity route.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
}

/// `GET /` - service identity, reachable without a token.
pub async fn info_handler() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /token` - reached only behind the auth gate, so reaching it at all
/// means the presented token is valid.
pub async fn token_handler() -> Json<Envelope> {
    Json(Envelope::verified())
}

impl IntoResponse for SettingsError {
    fn into_response(self) -> Response {
        warn!("settings persistence failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Envelope::failure(Value::Null)),
        )
            .into_response()
    }
}

/// `GET /settings` - the full current settings document.
pub async fn get_settings_handler<E: Extractor>(
    State(state): State<AppState<E>>,
) -> Json<Settings> {
    Json(state.settings.snapshot().await)
}

/// `POST /settings` - merge a partial update and return the full document.
pub async fn update_settings_handler<E: Extractor>(
    State(state): State<AppState<E>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<Settings>, SettingsError> {
    let settings = state.settings.update(update).await?;
    Ok(Json(settings))
}

// =============================================================================
// Outcome Mapping
// =============================================================================

fn report_failure(operation: &str, platform: Option<Platform>, err: &ExtractError) {
    match platform {
        Some(platform) => warn!(operation, platform = %platform, "extraction failed: {}", err),
        None => warn!(operation, "extraction failed: {}", err),
    }
}

/// Map a record-list result onto the envelope.
fn list_envelope(
    operation: &str,
    platform: Option<Platform>,
    params: Value,
    result: Result<Vec<Record>, ExtractError>,
) -> Envelope {
    match result {
        Ok(records) if records.is_empty() => Envelope::empty(params),
        Ok(records) => Envelope::success(params, Value::Array(records)),
        Err(err) => {
            report_failure(operation, platform, &err);
            Envelope::failure(params)
        }
    }
}

/// Map a single-record result onto the envelope.
fn record_envelope(
    operation: &str,
    platform: Option<Platform>,
    params: Value,
    result: Result<Option<Record>, ExtractError>,
) -> Envelope {
    match result {
        Ok(Some(record)) => Envelope::success(params, record),
        Ok(None) => Envelope::empty(params),
        Err(err) => {
            report_failure(operation, platform, &err);
            Envelope::failure(params)
        }
    }
}

// =============================================================================
// Extraction Routes
// =============================================================================

/// `POST /{platform}/share` - resolve a share link embedded in free text.
pub async fn share_handler<E: Extractor>(
    State(state): State<AppState<E>>,
    Extension(platform): Extension<Platform>,
    Json(request): Json<ShareLink>,
) -> Json<Envelope> {
    let params = params_of(&request);
    let envelope = match state
        .extractor
        .resolve_share(platform, &request.text, request.proxy.as_deref())
        .await
    {
        Ok(Some(url)) => Envelope::success(params, Value::String(url)),
        // No URL in the text is a failed resolution, not an empty result.
        Ok(None) => Envelope::failure(params),
        Err(err) => {
            report_failure("share", Some(platform), &err);
            Envelope::failure(params)
        }
    };
    Json(envelope)
}

/// `POST /{platform}/detail` - fetch one content item by id.
pub async fn detail_handler<E: Extractor>(
    State(state): State<AppState<E>>,
    Extension(platform): Extension<Platform>,
    Json(request): Json<Detail>,
) -> Json<Envelope> {
    let params = params_of(&request);
    let opts = FetchOptions::new(request.source, request.cookie.clone(), request.proxy.clone());

    let result = state
        .extractor
        .fetch_detail(platform, &[request.detail_id.clone()], &opts)
        .await
        .map(|mut records| {
            if records.is_empty() {
                None
            } else {
                Some(records.swap_remove(0))
            }
        });

    Json(record_envelope("detail", Some(platform), params, result))
}

/// `POST /{platform}/account` - fetch an account page tab.
pub async fn account_handler<E: Extractor>(
    State(state): State<AppState<E>>,
    Extension(platform): Extension<Platform>,
    Json(request): Json<Account>,
) -> Json<Envelope> {
    let params = params_of(&request);
    let opts = FetchOptions::new(request.source, request.cookie.clone(), request.proxy.clone());
    let query = AccountQuery {
        sec_user_id: request.sec_user_id.clone(),
        tab: request.tab.clone(),
        earliest: request.earliest.clone(),
        latest: request.latest.clone(),
        pages: request.pages,
        cursor: request.effective_cursor(),
        count: request.count,
    };

    let result = state.extractor.fetch_account(platform, &query, &opts).await;
    Json(list_envelope("account", Some(platform), params, result))
}

/// `POST /{platform}/mix` - fetch a collection by collection id or member
/// item id. Exactly one of the two must be present.
pub async fn mix_handler<E: Extractor>(
    State(state): State<AppState<E>>,
    Extension(platform): Extension<Platform>,
    Json(request): Json<Mix>,
) -> Json<Envelope> {
    let params = params_of(&request);

    let Some(target) = resolve_mix(request.mix_id.as_deref(), request.detail_id.as_deref())
    else {
        return Json(Envelope::invalid_params(params));
    };

    let opts = FetchOptions::new(request.source, request.cookie.clone(), request.proxy.clone());
    let result = state
        .extractor
        .fetch_collection(
            platform,
            &target,
            cursor_or_start(request.cursor),
            request.count,
            &opts,
        )
        .await;

    Json(list_envelope("mix", Some(platform), params, result))
}

/// `POST /{platform}/live` - fetch a live room.
///
/// The platform decides the identifier field: douyin uses `web_rid`, tiktok
/// uses `room_id`. The other field is ignored.
pub async fn live_handler<E: Extractor>(
    State(state): State<AppState<E>>,
    Extension(platform): Extension<Platform>,
    Json(request): Json<Live>,
) -> Json<Envelope> {
    let params = params_of(&request);

    let Some(ident) = live_identifier(
        platform,
        request.web_rid.as_deref(),
        request.room_id.as_deref(),
    ) else {
        return Json(Envelope::invalid_params(params));
    };

    let opts = FetchOptions::new(request.source, request.cookie.clone(), request.proxy.clone());
    let result = state.extractor.fetch_live(platform, &ident, &opts).await;
    Json(record_envelope("live", Some(platform), params, result))
}

/// `POST /douyin/comment` - fetch a content item's comment thread.
pub async fn comment_handler<E: Extractor>(
    State(state): State<AppState<E>>,
    Json(request): Json<Comment>,
) -> Json<Envelope> {
    let params = params_of(&request);
    let opts = FetchOptions::new(request.source, request.cookie.clone(), request.proxy.clone());
    let query = CommentQuery {
        detail_id: request.detail_id.clone(),
        pages: request.pages,
        cursor: cursor_or_start(request.cursor),
        count: request.count,
        count_reply: request.count_reply,
        with_replies: request.reply,
    };

    let result = state.extractor.fetch_comments(&query, &opts).await;
    Json(list_envelope("comment", None, params, result))
}

/// `POST /douyin/reply` - fetch replies under a comment.
pub async fn reply_handler<E: Extractor>(
    State(state): State<AppState<E>>,
    Json(request): Json<Reply>,
) -> Json<Envelope> {
    let params = params_of(&request);
    let opts = FetchOptions::new(request.source, request.cookie.clone(), request.proxy.clone());
    let query = ReplyQuery {
        detail_id: request.detail_id.clone(),
        comment_id: request.comment_id.clone(),
        pages: request.pages,
        cursor: cursor_or_start(request.cursor),
        count: request.count,
    };

    let result = state.extractor.fetch_replies(&query, &opts).await;
    Json(list_envelope("reply", None, params, result))
}

// =============================================================================
// Search Routes
// =============================================================================

/// Shared search funnel: all four variants differ only in their schema.
async fn run_search<E, R>(state: AppState<E>, request: R) -> Json<Envelope>
where
    E: Extractor,
    R: Serialize + IntoSearchJob,
{
    let params = params_of(&request);
    let opts = request.fetch_options();
    let job = request.into_job();

    let result = state.extractor.search(&job, &opts).await;
    Json(list_envelope(job.variant.name(), None, params, result))
}

/// `POST /douyin/search/general`
pub async fn search_general_handler<E: Extractor>(
    State(state): State<AppState<E>>,
    Json(request): Json<GeneralSearch>,
) -> Json<Envelope> {
    run_search(state, request).await
}

/// `POST /douyin/search/video`
pub async fn search_video_handler<E: Extractor>(
    State(state): State<AppState<E>>,
    Json(request): Json<VideoSearch>,
) -> Json<Envelope> {
    run_search(state, request).await
}

/// `POST /douyin/search/user`
pub async fn search_user_handler<E: Extractor>(
    State(state): State<AppState<E>>,
    Json(request): Json<UserSearch>,
) -> Json<Envelope> {
    run_search(state, request).await
}

/// `POST /douyin/search/live`
pub async fn search_live_handler<E: Extractor>(
    State(state): State<AppState<E>>,
    Json(request): Json<LiveSearch>,
) -> Json<Envelope> {
    run_search(state, request).await
}

// =============================================================================
// Tests
// =============================================================================
