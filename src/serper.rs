// src/serper.rs
use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Result;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use serde::Deserialize;

use crate::types::SearchHit;

const SERPER_URL: &str = "https://google.serper.dev/search";
const GOOGLE_CSE_URL: &str = "https://www.googleapis.com/customsearch/v1";
/// Google Custom Search rejects `num` above 10.
const GOOGLE_CSE_MAX_NUM: usize = 10;

/// Web search collaborator: ranked hits for a query, at most `limit` of them.
#[async_trait::async_trait]
pub trait Searcher: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
}

#[derive(Debug, Deserialize)]
struct WireItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

impl WireItem {
    /// A missing link becomes empty, so the hit fails the trust match and
    /// still reaches `others`.
    fn into_hit(self) -> SearchHit {
        SearchHit {
            title: self.title.unwrap_or_else(|| "No Title".to_string()),
            link: self.link.unwrap_or_default(),
            snippet: self.snippet.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SerperResp {
    #[serde(default)]
    organic: Vec<WireItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleCseResp {
    #[serde(default)]
    items: Vec<WireItem>,
}

fn collect_hits(items: Vec<WireItem>, limit: usize) -> Vec<SearchHit> {
    items.into_iter().map(WireItem::into_hit).take(limit).collect()
}

fn rate_limiter(qps: u32) -> DefaultDirectRateLimiter {
    let qps = NonZeroU32::new(qps).unwrap_or(nonzero!(1u32));
    RateLimiter::direct(Quota::per_second(qps))
}

/// serper.dev Google search API.
pub struct Serper {
    http: Client,
    key: String,
    url: String,
    limiter: DefaultDirectRateLimiter,
}

impl Serper {
    pub fn new(key: String, qps: u32, timeout_ms: u64) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?;
        Ok(Self { http, key, url: SERPER_URL.to_string(), limiter: rate_limiter(qps) })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait::async_trait]
impl Searcher for Serper {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        self.limiter.until_ready().await;
        let resp = self.http
            .post(&self.url)
            .header("X-API-KEY", &self.key)
            .json(&serde_json::json!({ "q": query, "num": limit }))
            .send().await?
            .error_for_status()?
            .json::<SerperResp>().await?;
        Ok(collect_hits(resp.organic, limit))
    }
}

/// Google Custom Search JSON API.
pub struct GoogleCse {
    http: Client,
    key: String,
    cse_id: String,
    url: String,
    limiter: DefaultDirectRateLimiter,
}

impl GoogleCse {
    pub fn new(key: String, cse_id: String, qps: u32, timeout_ms: u64) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?;
        Ok(Self { http, key, cse_id, url: GOOGLE_CSE_URL.to_string(), limiter: rate_limiter(qps) })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait::async_trait]
impl Searcher for GoogleCse {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        self.limiter.until_ready().await;
        let num = limit.clamp(1, GOOGLE_CSE_MAX_NUM).to_string();
        let resp = self.http
            .get(&self.url)
            .query(&[("key", self.key.as_str()), ("cx", self.cse_id.as_str()), ("q", query), ("num", num.as_str())])
            .send().await?
            .error_for_status()?
            .json::<GoogleCseResp>().await?;
        Ok(collect_hits(resp.items, limit))
    }
}
