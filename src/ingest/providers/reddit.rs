// src/ingest/providers/reddit.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::feed::parse_feed;
use super::{cap, Body};
use crate::ingest::types::{Fetcher, SourceRecord};

/// Hot posts of a few subreddits via the public RSS endpoints
/// (the JSON API rate-limits anonymous clients much harder).
pub struct RedditFetcher {
    subs: Vec<(String, Body)>,
}

impl RedditFetcher {
    /// `fixtures` is a list of (subreddit, xml).
    pub fn from_fixtures(fixtures: &[(&str, &str)]) -> Self {
        Self {
            subs: fixtures
                .iter()
                .map(|(sub, xml)| (sub.to_string(), Body::fixture(xml)))
                .collect(),
        }
    }

    #[cfg(feature = "ingest-http")]
    pub fn for_subreddits(subs: &[String], client: &reqwest::Client) -> Self {
        Self {
            subs: subs
                .iter()
                .map(|s| {
                    let url = format!("https://www.reddit.com/r/{s}/hot/.rss");
                    (s.clone(), Body::http(url, client))
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Fetcher for RedditFetcher {
    async fn fetch(&self, max_items: usize) -> Result<Vec<SourceRecord>> {
        let mut out = Vec::new();
        let mut failed = 0usize;
        for (sub, body) in &self.subs {
            let mut items = match body.read().await.and_then(|xml| parse_feed(&xml)) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(error = ?e, subreddit = %sub, "reddit feed skipped");
                    failed += 1;
                    continue;
                }
            };
            cap(&mut items, max_items, sub);
            // Posts without a permalink are useless to the dashboard.
            out.extend(
                items
                    .into_iter()
                    .filter_map(|it| it.link.map(|l| SourceRecord::new(it.title, l))),
            );
        }
        if failed > 0 && failed == self.subs.len() {
            return Err(anyhow!("all {failed} subreddit feeds failed"));
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "reddit"
    }
}
