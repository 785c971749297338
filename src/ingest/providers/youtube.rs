// src/ingest/providers/youtube.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{cap, record_parse_ms, Body};
use crate::ingest::normalize_title;
use crate::ingest::types::{Fetcher, SourceRecord};

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    id: String,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
}

#[cfg(feature = "ingest-http")]
const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

/// Most-popular chart of the video platform for one region.
/// Needs an API key; without one the fetcher fails and the bucket stays empty.
pub struct YouTubeFetcher {
    region: String,
    body: Option<Body>,
}

impl YouTubeFetcher {
    pub fn from_fixture(json: &str) -> Self {
        Self {
            region: "fixture".to_string(),
            body: Some(Body::fixture(json)),
        }
    }

    #[cfg(feature = "ingest-http")]
    pub fn most_popular(
        region: &str,
        max_results: usize,
        api_key: Option<&str>,
        client: &reqwest::Client,
    ) -> Self {
        Self::at_endpoint(VIDEOS_ENDPOINT, region, max_results, api_key, client)
    }

    // The key travels as a sensitive header, never in the URL.
    #[cfg(feature = "ingest-http")]
    fn at_endpoint(
        endpoint: &str,
        region: &str,
        max_results: usize,
        api_key: Option<&str>,
        client: &reqwest::Client,
    ) -> Self {
        use reqwest::header::{HeaderMap, HeaderValue};

        let key = api_key.map(str::trim).filter(|k| !k.is_empty()).and_then(|k| {
            HeaderValue::from_str(k)
                .map_err(|_| tracing::warn!(region, "YOUTUBE_API_KEY is not a valid header value"))
                .ok()
        });
        let body = key.map(|mut key| {
            key.set_sensitive(true);
            let mut headers = HeaderMap::new();
            headers.insert("x-goog-api-key", key);
            let url = format!(
                "{endpoint}?part=snippet&chart=mostPopular&regionCode={region}&maxResults={}",
                max_results.clamp(1, 50)
            );
            Body::http_with_headers(url, client, headers)
        });
        Self {
            region: region.to_string(),
            body,
        }
    }

    /// Fetcher with no credential configured.
    pub fn without_key(region: &str) -> Self {
        Self {
            region: region.to_string(),
            body: None,
        }
    }
}

fn parse_videos(json: &str) -> Result<Vec<SourceRecord>> {
    let t0 = std::time::Instant::now();
    let list: VideoList = serde_json::from_str(json).context("parsing video list json")?;
    let out = list
        .items
        .into_iter()
        .filter_map(|v| {
            let title = normalize_title(v.snippet.and_then(|s| s.title).as_deref()?);
            if title.is_empty() {
                return None;
            }
            Some(SourceRecord::new(
                title,
                format!("https://www.youtube.com/watch?v={}", v.id),
            ))
        })
        .collect();
    record_parse_ms(t0);
    Ok(out)
}

#[async_trait]
impl Fetcher for YouTubeFetcher {
    async fn fetch(&self, max_items: usize) -> Result<Vec<SourceRecord>> {
        let body = self
            .body
            .as_ref()
            .ok_or_else(|| anyhow!("YOUTUBE_API_KEY not set"))?;
        let json = body
            .read()
            .await
            .with_context(|| format!("video chart for {}", self.region))?;
        let mut out = parse_videos(&json)?;
        cap(&mut out, max_items, &self.region);
        Ok(out)
    }

    fn name(&self) -> &str {
        &self.region
    }
}
