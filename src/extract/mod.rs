//! Extraction engine contract.
//!
//! The gateway orchestrates; the engine scrapes. Everything that talks to the
//! remote platforms sits behind the [`Extractor`] trait so the HTTP front end
//! and any interactive front end share one engine implementation, and tests
//! can inject a stub.
//!
//! # Result tagging
//!
//! Every operation returns a tagged result so "no matching records" and
//! "operation failed" stay distinguishable:
//!
//! - `Ok(vec![])` / `Ok(None)` — the request completed but matched nothing
//! - `Err(ExtractError)` — the engine could not complete the request
//!
//! The gateway maps the former to the "empty result" envelope and the latter
//! to the generic failure envelope, never inspecting the error cause.

mod web;

pub use web::WebExtractor;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ExtractError;
use crate::platform::Platform;
use crate::validate::{LiveIdent, MixTarget};

/// A single extracted record: normalized or raw, always JSON.
pub type Record = Value;

/// Per-request engine options shared by every operation.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Return the engine's unprocessed payload instead of normalized records
    pub raw: bool,

    /// Per-request platform cookie override
    pub cookie: Option<String>,

    /// Per-request proxy address
    pub proxy: Option<String>,
}

impl FetchOptions {
    /// Assemble options from the common schema fields.
    pub fn new(raw: bool, cookie: Option<String>, proxy: Option<String>) -> Self {
        Self { raw, cookie, proxy }
    }
}

/// Account-post query, normalized by the validator.
#[derive(Debug, Clone)]
pub struct AccountQuery {
    pub sec_user_id: String,
    pub tab: String,
    pub earliest: Option<String>,
    pub latest: Option<String>,
    pub pages: Option<u32>,
    pub cursor: u64,
    pub count: Option<u32>,
}

/// Comment-thread query.
#[derive(Debug, Clone)]
pub struct CommentQuery {
    pub detail_id: String,
    pub pages: Option<u32>,
    pub cursor: u64,
    pub count: Option<u32>,
    pub count_reply: Option<u32>,
    pub with_replies: bool,
}

/// Comment-reply query.
#[derive(Debug, Clone)]
pub struct ReplyQuery {
    pub detail_id: String,
    pub comment_id: String,
    pub pages: Option<u32>,
    pub cursor: u64,
    pub count: Option<u32>,
}

/// The four search route variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchVariant {
    General,
    Video,
    User,
    Live,
}

impl SearchVariant {
    pub fn name(&self) -> &'static str {
        match self {
            SearchVariant::General => "general",
            SearchVariant::Video => "video",
            SearchVariant::User => "user",
            SearchVariant::Live => "live",
        }
    }
}

/// Variant-specific search filters; unset fields are not forwarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub sort_type: Option<String>,
    pub publish_time: Option<String>,
    pub duration: Option<String>,
    pub search_range: Option<String>,
    pub content_type: Option<String>,
    pub user_fans: Option<String>,
    pub user_type: Option<String>,
}

/// One unified search dispatch job; the variant is the only behavioral branch.
#[derive(Debug, Clone)]
pub struct SearchJob {
    pub variant: SearchVariant,
    pub keyword: String,
    pub offset: u32,
    pub count: Option<u32>,
    pub pages: Option<u32>,
    pub filters: SearchFilters,
}

/// The narrow operation contract the gateway requires of an engine.
///
/// Implementations own retries, anti-bot signing, remote pagination, and
/// latency bounds. The gateway treats any `Err` as an opaque failure.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Resolve a share link embedded in free text to its full URL.
    async fn resolve_share(
        &self,
        platform: Platform,
        text: &str,
        proxy: Option<&str>,
    ) -> Result<Option<String>, ExtractError>;

    /// Fetch one or more content items by identifier.
    async fn fetch_detail(
        &self,
        platform: Platform,
        ids: &[String],
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError>;

    /// Fetch an account page tab, optionally date-bounded.
    async fn fetch_account(
        &self,
        platform: Platform,
        query: &AccountQuery,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError>;

    /// Fetch a collection's items, located by collection id or member item id.
    async fn fetch_collection(
        &self,
        platform: Platform,
        target: &MixTarget,
        cursor: u64,
        count: Option<u32>,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError>;

    /// Fetch a live room.
    async fn fetch_live(
        &self,
        platform: Platform,
        ident: &LiveIdent,
        opts: &FetchOptions,
    ) -> Result<Option<Record>, ExtractError>;

    /// Fetch a content item's comment thread.
    async fn fetch_comments(
        &self,
        query: &CommentQuery,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError>;

    /// Fetch replies under a comment.
    async fn fetch_replies(
        &self,
        query: &ReplyQuery,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError>;

    /// Run a search; an empty list is a valid outcome, not an error.
    async fn search(
        &self,
        job: &SearchJob,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError>;
}
