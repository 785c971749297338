// src/ingest/catalog.rs
//! Declarative source catalog: which fetchers feed which bucket.
//!
//! TOML shape:
//! ```toml
//! [[buckets]]
//! name = "tech"
//! [[buckets.sources]]
//! kind = "feed"
//! urls = ["https://news.ycombinator.com/rss"]
//! ```

use serde::{Deserialize, Serialize};

#[cfg(feature = "ingest-http")]
use crate::ingest::{
    providers::{
        feed::FeedFetcher, reddit::RedditFetcher, trends::TrendsFetcher,
        wikipedia::WikipediaFetcher, youtube::YouTubeFetcher,
    },
    types::Fetcher,
    BucketPlan,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceSpec {
    /// Any RSS 2.0 / Atom feeds.
    Feed { urls: Vec<String> },
    /// Daily search trends for a geo code.
    Trends { geo: String },
    /// Subreddit hot lists.
    Reddit { subreddits: Vec<String> },
    /// Pageview top list of a wiki project, e.g. "en.wikipedia".
    Wikipedia { project: String },
    /// Most-popular video chart for a region code.
    Youtube { region: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSpec {
    pub name: String,
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// The buckets the dashboard knows about, plus trends and video.
pub fn default_catalog() -> Vec<BucketSpec> {
    vec![
        BucketSpec {
            name: "major_outlets".into(),
            sources: vec![SourceSpec::Feed {
                urls: urls(&[
                    "https://feeds.bbci.co.uk/news/rss.xml",
                    "https://rss.nytimes.com/services/xml/rss/nyt/HomePage.xml",
                    "https://feeds.npr.org/1001/rss.xml",
                ]),
            }],
        },
        BucketSpec {
            name: "reddit".into(),
            sources: vec![SourceSpec::Reddit {
                subreddits: urls(&["news", "worldnews", "politics"]),
            }],
        },
        BucketSpec {
            name: "tech".into(),
            sources: vec![SourceSpec::Feed {
                urls: urls(&[
                    "https://news.ycombinator.com/rss",
                    "https://www.techmeme.com/feed.xml",
                ]),
            }],
        },
        BucketSpec {
            name: "wikipedia".into(),
            sources: vec![SourceSpec::Wikipedia {
                project: "en.wikipedia".into(),
            }],
        },
        BucketSpec {
            name: "trends".into(),
            sources: vec![SourceSpec::Trends { geo: "US".into() }],
        },
        BucketSpec {
            name: "video".into(),
            sources: vec![SourceSpec::Youtube {
                region: "US".into(),
            }],
        },
    ]
}

/// Turn the catalog into live HTTP fetchers, one plan per bucket.
#[cfg(feature = "ingest-http")]
pub fn build_plans(
    catalog: &[BucketSpec],
    client: &reqwest::Client,
    max_items: usize,
    youtube_api_key: Option<&str>,
) -> Vec<BucketPlan> {
    catalog
        .iter()
        .map(|bucket| {
            let fetchers = bucket
                .sources
                .iter()
                .filter_map(|spec| -> Option<Box<dyn Fetcher>> {
                    match spec {
                        SourceSpec::Feed { urls } => Some(Box::new(FeedFetcher::from_urls(
                            format!("feed:{}", bucket.name),
                            urls,
                            client,
                        ))),
                        SourceSpec::Trends { geo } => {
                            Some(Box::new(TrendsFetcher::for_geo(geo, client)))
                        }
                        SourceSpec::Reddit { subreddits } => {
                            Some(Box::new(RedditFetcher::for_subreddits(subreddits, client)))
                        }
                        SourceSpec::Wikipedia { project } => {
                            match WikipediaFetcher::for_project(project, client) {
                                Ok(f) => Some(Box::new(f)),
                                Err(e) => {
                                    tracing::warn!(error = ?e, project = %project, "wikipedia source skipped");
                                    None
                                }
                            }
                        }
                        SourceSpec::Youtube { region } => Some(Box::new(
                            YouTubeFetcher::most_popular(region, max_items, youtube_api_key, client),
                        )),
                    }
                })
                .collect();
            BucketPlan {
                name: bucket.name.clone(),
                fetchers,
            }
        })
        .collect()
}
