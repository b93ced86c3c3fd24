//! Typed request schemas for every gateway operation.
//!
//! Each operation binds its JSON body against one of these records. Fields
//! shared by every extraction operation:
//!
//! - `cookie`: per-request platform cookie override
//! - `proxy`: per-request proxy address
//! - `source`: return the engine's unprocessed payload instead of normalized
//!   records (default false)
//!
//! Schemas are deserialized once, validated, and echoed back verbatim in the
//! envelope's `params` field; they stay immutable for the request lifetime.
//! Constraints a schema alone cannot express (mutually exclusive identifiers,
//! platform-appropriate live room ids) live in [`crate::validate`].

use serde::{Deserialize, Serialize};

use crate::extract::{FetchOptions, SearchFilters, SearchJob, SearchVariant};
use crate::validate::cursor_or_start;

fn default_tab() -> String {
    "post".to_string()
}

/// Body for `POST /{platform}/share`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLink {
    /// Free text containing a shareable URL
    pub text: String,

    #[serde(default)]
    pub proxy: Option<String>,
}

/// Body for `POST /{platform}/detail`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detail {
    #[serde(default)]
    pub cookie: Option<String>,

    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default)]
    pub source: bool,

    /// Content-item identifier
    pub detail_id: String,
}

/// Body for `POST /{platform}/account`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub cookie: Option<String>,

    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default)]
    pub source: bool,

    /// Account identifier (`sec_uid` / `secUid`)
    pub sec_user_id: String,

    /// Account page tab (default `post`)
    #[serde(default = "default_tab")]
    pub tab: String,

    /// Earliest publish date to include
    #[serde(default)]
    pub earliest: Option<String>,

    /// Latest publish date to include
    #[serde(default)]
    pub latest: Option<String>,

    /// Maximum page-fetch count
    #[serde(default)]
    pub pages: Option<u32>,

    #[serde(default)]
    pub cursor: Option<u64>,

    #[serde(default)]
    pub count: Option<u32>,
}

/// Body for `POST /{platform}/mix`.
///
/// Exactly one of `mix_id` and `detail_id` must be present; see
/// [`crate::validate::resolve_mix`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mix {
    #[serde(default)]
    pub cookie: Option<String>,

    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default)]
    pub source: bool,

    /// Collection identifier
    #[serde(default)]
    pub mix_id: Option<String>,

    /// Identifier of a content item belonging to the collection
    #[serde(default)]
    pub detail_id: Option<String>,

    #[serde(default)]
    pub cursor: Option<u64>,

    #[serde(default)]
    pub count: Option<u32>,
}

/// Body for `POST /{platform}/live`.
///
/// Douyin rooms are keyed by `web_rid`, tiktok rooms by `room_id`; the route's
/// platform decides which field is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Live {
    #[serde(default)]
    pub cookie: Option<String>,

    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default)]
    pub source: bool,

    /// Douyin web room identifier
    #[serde(default)]
    pub web_rid: Option<String>,

    /// Tiktok numeric room identifier
    #[serde(default)]
    pub room_id: Option<String>,
}

/// Body for `POST /douyin/comment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub cookie: Option<String>,

    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default)]
    pub source: bool,

    /// Content-item identifier
    pub detail_id: String,

    /// Maximum page-fetch count
    #[serde(default)]
    pub pages: Option<u32>,

    #[serde(default)]
    pub cursor: Option<u64>,

    #[serde(default)]
    pub count: Option<u32>,

    /// Reply count to request per comment
    #[serde(default)]
    pub count_reply: Option<u32>,

    /// Also fetch nested replies
    #[serde(default)]
    pub reply: bool,
}

/// Body for `POST /douyin/reply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub cookie: Option<String>,

    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default)]
    pub source: bool,

    /// Content-item identifier
    pub detail_id: String,

    /// Parent comment identifier
    pub comment_id: String,

    #[serde(default)]
    pub pages: Option<u32>,

    #[serde(default)]
    pub cursor: Option<u64>,

    #[serde(default)]
    pub count: Option<u32>,
}

/// Body for `POST /douyin/search/general`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSearch {
    #[serde(default)]
    pub cookie: Option<String>,

    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default)]
    pub source: bool,

    pub keyword: String,

    #[serde(default)]
    pub offset: Option<u32>,

    #[serde(default)]
    pub count: Option<u32>,

    #[serde(default)]
    pub pages: Option<u32>,

    #[serde(default)]
    pub sort_type: Option<String>,

    #[serde(default)]
    pub publish_time: Option<String>,

    #[serde(default)]
    pub duration: Option<String>,

    #[serde(default)]
    pub search_range: Option<String>,

    #[serde(default)]
    pub content_type: Option<String>,
}

/// Body for `POST /douyin/search/video`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSearch {
    #[serde(default)]
    pub cookie: Option<String>,

    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default)]
    pub source: bool,

    pub keyword: String,

    #[serde(default)]
    pub offset: Option<u32>,

    #[serde(default)]
    pub count: Option<u32>,

    #[serde(default)]
    pub pages: Option<u32>,

    #[serde(default)]
    pub sort_type: Option<String>,

    #[serde(default)]
    pub publish_time: Option<String>,

    #[serde(default)]
    pub duration: Option<String>,

    #[serde(default)]
    pub search_range: Option<String>,
}

/// Body for `POST /douyin/search/user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSearch {
    #[serde(default)]
    pub cookie: Option<String>,

    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default)]
    pub source: bool,

    pub keyword: String,

    #[serde(default)]
    pub offset: Option<u32>,

    #[serde(default)]
    pub count: Option<u32>,

    #[serde(default)]
    pub pages: Option<u32>,

    /// Audience-size filter
    #[serde(default)]
    pub douyin_user_fans: Option<String>,

    /// Account-type filter
    #[serde(default)]
    pub douyin_user_type: Option<String>,
}

/// Body for `POST /douyin/search/live`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveSearch {
    #[serde(default)]
    pub cookie: Option<String>,

    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default)]
    pub source: bool,

    pub keyword: String,

    #[serde(default)]
    pub offset: Option<u32>,

    #[serde(default)]
    pub count: Option<u32>,

    #[serde(default)]
    pub pages: Option<u32>,
}

// =============================================================================
// Search unification
// =============================================================================

/// Conversion of a search schema to the one dispatch job the engine sees.
///
/// All four variants funnel into [`SearchJob`]; the only behavioral branch is
/// which filter fields are forwarded. The common `source`/`cookie`/`proxy`
/// fields travel separately as [`FetchOptions`].
pub trait IntoSearchJob {
    /// Engine options carried by the common schema fields.
    fn fetch_options(&self) -> FetchOptions;

    fn into_job(self) -> SearchJob;
}

impl IntoSearchJob for GeneralSearch {
    fn fetch_options(&self) -> FetchOptions {
        FetchOptions::new(self.source, self.cookie.clone(), self.proxy.clone())
    }

    fn into_job(self) -> SearchJob {
        SearchJob {
            variant: SearchVariant::General,
            keyword: self.keyword,
            offset: self.offset.unwrap_or(0),
            count: self.count,
            pages: self.pages,
            filters: SearchFilters {
                sort_type: self.sort_type,
                publish_time: self.publish_time,
                duration: self.duration,
                search_range: self.search_range,
                content_type: self.content_type,
                ..SearchFilters::default()
            },
        }
    }
}

impl IntoSearchJob for VideoSearch {
    fn fetch_options(&self) -> FetchOptions {
        FetchOptions::new(self.source, self.cookie.clone(), self.proxy.clone())
    }

    fn into_job(self) -> SearchJob {
        SearchJob {
            variant: SearchVariant::Video,
            keyword: self.keyword,
            offset: self.offset.unwrap_or(0),
            count: self.count,
            pages: self.pages,
            filters: SearchFilters {
                sort_type: self.sort_type,
                publish_time: self.publish_time,
                duration: self.duration,
                search_range: self.search_range,
                ..SearchFilters::default()
            },
        }
    }
}

impl IntoSearchJob for UserSearch {
    fn fetch_options(&self) -> FetchOptions {
        FetchOptions::new(self.source, self.cookie.clone(), self.proxy.clone())
    }

    fn into_job(self) -> SearchJob {
        SearchJob {
            variant: SearchVariant::User,
            keyword: self.keyword,
            offset: self.offset.unwrap_or(0),
            count: self.count,
            pages: self.pages,
            filters: SearchFilters {
                user_fans: self.douyin_user_fans,
                user_type: self.douyin_user_type,
                ..SearchFilters::default()
            },
        }
    }
}

impl IntoSearchJob for LiveSearch {
    fn fetch_options(&self) -> FetchOptions {
        FetchOptions::new(self.source, self.cookie.clone(), self.proxy.clone())
    }

    fn into_job(self) -> SearchJob {
        SearchJob {
            variant: SearchVariant::Live,
            keyword: self.keyword,
            offset: self.offset.unwrap_or(0),
            count: self.count,
            pages: self.pages,
            filters: SearchFilters::default(),
        }
    }
}

impl Account {
    /// Effective pagination cursor, defaulting to the start of the sequence.
    pub fn effective_cursor(&self) -> u64 {
        cursor_or_start(self.cursor)
    }
}
