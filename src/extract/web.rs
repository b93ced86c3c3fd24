//! Thin reqwest-backed engine for development and self-hosted use.
//!
//! `WebExtractor` speaks to the platforms' public web APIs directly: share
//! links are resolved by following redirects, and record operations issue
//! plain JSON requests with the configured cookies. It deliberately does NOT
//! implement anti-bot signing or retry policy; deployments that need those
//! plug in a full engine behind the same [`Extractor`](super::Extractor)
//! trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{COOKIE, REFERER, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::Settings;
use crate::error::ExtractError;
use crate::platform::Platform;
use crate::validate::{LiveIdent, MixTarget};

use super::{
    AccountQuery, CommentQuery, Extractor, FetchOptions, Record, ReplyQuery, SearchJob,
    SearchVariant,
};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

const DOUYIN_API: &str = "https://www.douyin.com/aweme/v1/web";
const DOUYIN_LIVE_API: &str = "https://live.douyin.com/webcast/room/web/enter/";
const TIKTOK_API: &str = "https://www.tiktok.com/api";
const TIKTOK_LIVE_API: &str = "https://webcast.tiktok.com/webcast/room/info/";

/// Engine implementation over the platforms' public web APIs.
pub struct WebExtractor {
    client: Client,
    cookie: String,
    cookie_tiktok: String,
    timeout: Duration,
}

impl WebExtractor {
    /// Build an extractor from the settings document.
    pub fn new(settings: &Settings) -> Result<Self, ExtractError> {
        let timeout = Duration::from_secs(settings.timeout.max(1));
        let client = build_client(timeout, proxy_of(&settings.proxy))?;
        Ok(Self {
            client,
            cookie: settings.cookie.clone(),
            cookie_tiktok: settings.cookie_tiktok.clone(),
            timeout,
        })
    }

    /// Client honoring a per-request proxy override.
    fn client_for(&self, proxy: Option<&str>) -> Result<Client, ExtractError> {
        match proxy {
            Some(proxy) if !proxy.is_empty() => build_client(self.timeout, Some(proxy)),
            _ => Ok(self.client.clone()),
        }
    }

    fn cookie_for(&self, platform: Platform, opts: &FetchOptions) -> String {
        if let Some(cookie) = &opts.cookie {
            return cookie.clone();
        }
        match platform {
            Platform::Douyin => self.cookie.clone(),
            Platform::Tiktok => self.cookie_tiktok.clone(),
        }
    }

    async fn get_json(
        &self,
        platform: Platform,
        url: &str,
        query: &[(&str, String)],
        opts: &FetchOptions,
    ) -> Result<Value, ExtractError> {
        let client = self.client_for(opts.proxy.as_deref())?;
        let referer = match platform {
            Platform::Douyin => "https://www.douyin.com/",
            Platform::Tiktok => "https://www.tiktok.com/",
        };

        let mut request = client
            .get(url)
            .query(query)
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .header(REFERER, referer);

        let cookie = self.cookie_for(platform, opts);
        if !cookie.is_empty() {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        if response.status().as_u16() == 429 {
            return Err(ExtractError::RateLimited);
        }
        let response = response.error_for_status()?;

        debug!(url, platform = %platform, "upstream request completed");
        Ok(response.json::<Value>().await?)
    }

    /// Locate the collection id for a member item, when the item belongs to one.
    async fn collection_id_for_item(
        &self,
        platform: Platform,
        item_id: &str,
        opts: &FetchOptions,
    ) -> Result<Option<String>, ExtractError> {
        let lookup = FetchOptions::new(false, opts.cookie.clone(), opts.proxy.clone());
        let details = self
            .fetch_detail(platform, &[item_id.to_string()], &lookup)
            .await?;
        let Some(detail) = details.first() else {
            return Ok(None);
        };
        let id = detail
            .pointer("/mix_info/mix_id")
            .or_else(|| detail.pointer("/mixInfo/mixId"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(id)
    }
}

#[async_trait]
impl Extractor for WebExtractor {
    async fn resolve_share(
        &self,
        platform: Platform,
        text: &str,
        proxy: Option<&str>,
    ) -> Result<Option<String>, ExtractError> {
        let Some(candidate) = first_url(text) else {
            return Ok(None);
        };
        let Ok(url) = Url::parse(candidate) else {
            return Ok(None);
        };

        let client = self.client_for(proxy)?;
        let response = client
            .get(url)
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .send()
            .await?;

        debug!(platform = %platform, share = candidate, resolved = %response.url(), "share link resolved");
        Ok(Some(response.url().to_string()))
    }

    async fn fetch_detail(
        &self,
        platform: Platform,
        ids: &[String],
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            let payload = match platform {
                Platform::Douyin => {
                    let url = format!("{DOUYIN_API}/aweme/detail/");
                    self.get_json(platform, &url, &[("aweme_id", id.clone())], opts)
                        .await?
                }
                Platform::Tiktok => {
                    let url = format!("{TIKTOK_API}/item/detail/");
                    self.get_json(platform, &url, &[("itemId", id.clone())], opts)
                        .await?
                }
            };
            if opts.raw {
                records.push(payload);
                continue;
            }
            if let Some(record) = pluck_one(&payload, &["/aweme_detail", "/itemInfo/itemStruct"]) {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn fetch_account(
        &self,
        platform: Platform,
        query: &AccountQuery,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError> {
        let cursor = query.cursor.to_string();
        let count = query.count.unwrap_or(18).to_string();
        let payload = match platform {
            Platform::Douyin => {
                let url = format!("{DOUYIN_API}/aweme/{}/", account_endpoint(&query.tab));
                self.get_json(
                    platform,
                    &url,
                    &[
                        ("sec_user_id", query.sec_user_id.clone()),
                        ("max_cursor", cursor),
                        ("count", count),
                    ],
                    opts,
                )
                .await?
            }
            Platform::Tiktok => {
                let url = format!("{TIKTOK_API}/post/item_list/");
                self.get_json(
                    platform,
                    &url,
                    &[
                        ("secUid", query.sec_user_id.clone()),
                        ("cursor", cursor),
                        ("count", count),
                    ],
                    opts,
                )
                .await?
            }
        };
        Ok(unwrap_records(payload, &["/aweme_list", "/itemList"], opts.raw))
    }

    async fn fetch_collection(
        &self,
        platform: Platform,
        target: &MixTarget,
        cursor: u64,
        count: Option<u32>,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError> {
        let collection_id = match target {
            MixTarget::Collection(id) => id.clone(),
            MixTarget::Item(item_id) => {
                match self.collection_id_for_item(platform, item_id, opts).await? {
                    Some(id) => id,
                    // The item exists but belongs to no collection.
                    None => return Ok(Vec::new()),
                }
            }
        };

        let cursor = cursor.to_string();
        let count = count.unwrap_or(30).to_string();
        let payload = match platform {
            Platform::Douyin => {
                let url = format!("{DOUYIN_API}/mix/aweme/");
                self.get_json(
                    platform,
                    &url,
                    &[("mix_id", collection_id), ("cursor", cursor), ("count", count)],
                    opts,
                )
                .await?
            }
            Platform::Tiktok => {
                let url = format!("{TIKTOK_API}/mix/item_list/");
                self.get_json(
                    platform,
                    &url,
                    &[("mixId", collection_id), ("cursor", cursor), ("count", count)],
                    opts,
                )
                .await?
            }
        };
        Ok(unwrap_records(payload, &["/aweme_list", "/itemList"], opts.raw))
    }

    async fn fetch_live(
        &self,
        platform: Platform,
        ident: &LiveIdent,
        opts: &FetchOptions,
    ) -> Result<Option<Record>, ExtractError> {
        let payload = match ident {
            LiveIdent::WebRid(web_rid) => {
                self.get_json(
                    platform,
                    DOUYIN_LIVE_API,
                    &[("web_rid", web_rid.clone())],
                    opts,
                )
                .await?
            }
            LiveIdent::RoomId(room_id) => {
                self.get_json(
                    platform,
                    TIKTOK_LIVE_API,
                    &[("room_id", room_id.clone())],
                    opts,
                )
                .await?
            }
        };
        if opts.raw {
            return Ok(Some(payload));
        }
        Ok(pluck_one(&payload, &["/data/data/0", "/data"]))
    }

    async fn fetch_comments(
        &self,
        query: &CommentQuery,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError> {
        let url = format!("{DOUYIN_API}/comment/list/");
        let payload = self
            .get_json(
                Platform::Douyin,
                &url,
                &[
                    ("aweme_id", query.detail_id.clone()),
                    ("cursor", query.cursor.to_string()),
                    ("count", query.count.unwrap_or(20).to_string()),
                ],
                opts,
            )
            .await?;
        let mut comments = unwrap_records(payload, &["/comments"], opts.raw);

        if query.with_replies && !opts.raw {
            let reply_count = query.count_reply.unwrap_or(3);
            for comment in &mut comments {
                let Some(comment_id) = comment.get("cid").and_then(Value::as_str) else {
                    continue;
                };
                let replies = self
                    .fetch_replies(
                        &ReplyQuery {
                            detail_id: query.detail_id.clone(),
                            comment_id: comment_id.to_string(),
                            pages: query.pages,
                            cursor: 0,
                            count: Some(reply_count),
                        },
                        opts,
                    )
                    .await?;
                if let Some(object) = comment.as_object_mut() {
                    object.insert("replies".to_string(), Value::Array(replies));
                }
            }
        }
        Ok(comments)
    }

    async fn fetch_replies(
        &self,
        query: &ReplyQuery,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError> {
        let url = format!("{DOUYIN_API}/comment/list/reply/");
        let payload = self
            .get_json(
                Platform::Douyin,
                &url,
                &[
                    ("item_id", query.detail_id.clone()),
                    ("comment_id", query.comment_id.clone()),
                    ("cursor", query.cursor.to_string()),
                    ("count", query.count.unwrap_or(3).to_string()),
                ],
                opts,
            )
            .await?;
        Ok(unwrap_records(payload, &["/comments"], opts.raw))
    }

    async fn search(
        &self,
        job: &SearchJob,
        opts: &FetchOptions,
    ) -> Result<Vec<Record>, ExtractError> {
        let url = match job.variant {
            SearchVariant::General => format!("{DOUYIN_API}/general/search/single/"),
            SearchVariant::Video => format!("{DOUYIN_API}/search/item/"),
            SearchVariant::User => format!("{DOUYIN_API}/discover/search/"),
            SearchVariant::Live => format!("{DOUYIN_API}/live/search/"),
        };

        let mut query: Vec<(&str, String)> = vec![
            ("keyword", job.keyword.clone()),
            ("offset", job.offset.to_string()),
            ("count", job.count.unwrap_or(10).to_string()),
        ];
        let filters = &job.filters;
        for (key, value) in [
            ("sort_type", &filters.sort_type),
            ("publish_time", &filters.publish_time),
            ("filter_duration", &filters.duration),
            ("search_range", &filters.search_range),
            ("content_type", &filters.content_type),
            ("douyin_user_fans", &filters.user_fans),
            ("douyin_user_type", &filters.user_type),
        ] {
            if let Some(value) = value {
                query.push((key, value.clone()));
            }
        }

        let payload = self.get_json(Platform::Douyin, &url, &query, opts).await?;
        Ok(unwrap_records(
            payload,
            &["/data", "/user_list", "/aweme_list"],
            opts.raw,
        ))
    }
}

fn build_client(timeout: Duration, proxy: Option<&str>) -> Result<Client, ExtractError> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .redirect(Policy::limited(10));
    if let Some(proxy) = proxy {
        let proxy =
            reqwest::Proxy::all(proxy).map_err(|e| ExtractError::Network(e.to_string()))?;
        builder = builder.proxy(proxy);
    }
    builder
        .build()
        .map_err(|e| ExtractError::Network(e.to_string()))
}

fn proxy_of(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn account_endpoint(tab: &str) -> &'static str {
    match tab {
        "like" | "favorite" => "favorite",
        "collection" => "listcollection",
        _ => "post",
    }
}

/// Extract the first URL embedded in free text.
fn first_url(text: &str) -> Option<&str> {
    let start = text.find("http://").or_else(|| text.find("https://"))?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '"' || c == '\'')
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Pull the record list out of an upstream payload, trying each pointer in turn.
fn unwrap_records(payload: Value, pointers: &[&str], raw: bool) -> Vec<Record> {
    if raw {
        return vec![payload];
    }
    for pointer in pointers {
        if let Some(Value::Array(records)) = payload.pointer(pointer) {
            return records.clone();
        }
    }
    Vec::new()
}

/// Pull a single record out of an upstream payload.
fn pluck_one(payload: &Value, pointers: &[&str]) -> Option<Record> {
    for pointer in pointers {
        match payload.pointer(pointer) {
            Some(Value::Null) | None => continue,
            Some(record) => return Some(record.clone()),
        }
    }
    None
}
