// src/ingest/providers/trends.rs
use anyhow::Result;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use super::feed::parse_feed;
use super::{cap, Body};
use crate::ingest::types::{Fetcher, SourceRecord};

pub const EXPLORE_URL: &str = "https://trends.google.com/trends/explore";

/// Daily search trends for one geo, read from the Trends RSS feed.
/// Each item links back to the Trends explore page for that query.
pub struct TrendsFetcher {
    name: String,
    body: Body,
}

impl TrendsFetcher {
    pub fn from_fixture(xml: &str) -> Self {
        Self {
            name: "trends:fixture".to_string(),
            body: Body::fixture(xml),
        }
    }

    #[cfg(feature = "ingest-http")]
    pub fn for_geo(geo: &str, client: &reqwest::Client) -> Self {
        let url = format!("https://trends.google.com/trends/trendingsearches/daily/rss?geo={geo}");
        Self {
            name: format!("trends:{geo}"),
            body: Body::http(url, client),
        }
    }
}

/// `https://trends.google.com/trends/explore?q=<query>` with the query percent-encoded.
pub fn explore_link(query: &str) -> String {
    format!("{EXPLORE_URL}?q={}", utf8_percent_encode(query, NON_ALPHANUMERIC))
}

#[async_trait]
impl Fetcher for TrendsFetcher {
    async fn fetch(&self, max_items: usize) -> Result<Vec<SourceRecord>> {
        let xml = self.body.read().await?;
        let mut items = parse_feed(&xml)?;
        cap(&mut items, max_items, &self.name);
        Ok(items
            .into_iter()
            .map(|it| {
                let url = explore_link(&it.title);
                SourceRecord::new(it.title, url)
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
