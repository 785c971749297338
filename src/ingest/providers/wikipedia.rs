// src/ingest/providers/wikipedia.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
#[cfg(feature = "ingest-http")]
use time::Duration;
use time::{format_description, OffsetDateTime};

use super::{cap, record_parse_ms, Body};
use crate::ingest::normalize_title;
use crate::ingest::types::{Fetcher, SourceRecord};

#[cfg(feature = "ingest-http")]
const PAGEVIEWS_TOP: &str = "https://wikimedia.org/api/rest_v1/metrics/pageviews/top";

#[derive(Debug, Deserialize)]
struct TopResponse {
    #[serde(default)]
    items: Vec<TopDay>,
}

#[derive(Debug, Deserialize)]
struct TopDay {
    #[serde(default)]
    articles: Vec<TopArticle>,
}

#[derive(Debug, Deserialize)]
struct TopArticle {
    article: String,
}

/// Most-read articles of one wiki project for the previous UTC day.
pub struct WikipediaFetcher {
    project: String,
    body: Body,
}

impl WikipediaFetcher {
    pub fn from_fixture(project: &str, json: &str) -> Self {
        Self {
            project: project.to_string(),
            body: Body::fixture(json),
        }
    }

    #[cfg(feature = "ingest-http")]
    pub fn for_project(project: &str, client: &reqwest::Client) -> Result<Self> {
        let day = day_path(OffsetDateTime::now_utc() - Duration::days(1))?;
        let url = format!("{PAGEVIEWS_TOP}/{project}/all-access/{day}");
        Ok(Self {
            project: project.to_string(),
            body: Body::http(url, client),
        })
    }
}

/// `YYYY/MM/DD` as the pageviews API wants it.
pub fn day_path(day: OffsetDateTime) -> Result<String> {
    let fmt = format_description::parse("[year]/[month]/[day]")
        .context("building pageviews date format")?;
    day.format(&fmt).context("formatting pageviews date")
}

/// Front page, the "-" bucket and namespaced pages (Special:, File:, ...) are noise.
fn is_content_article(article: &str) -> bool {
    article != "Main_Page" && article != "-" && !article.contains(':')
}

fn parse_top(project: &str, json: &str) -> Result<Vec<SourceRecord>> {
    let t0 = std::time::Instant::now();
    let resp: TopResponse = serde_json::from_str(json).context("parsing pageviews json")?;
    let out = resp
        .items
        .into_iter()
        .flat_map(|day| day.articles)
        .filter(|a| is_content_article(&a.article))
        .filter_map(|a| {
            let title = normalize_title(&a.article.replace('_', " "));
            if title.is_empty() {
                return None;
            }
            let url = format!("https://{project}.org/wiki/{}", a.article);
            Some(SourceRecord::new(title, url))
        })
        .collect();
    record_parse_ms(t0);
    Ok(out)
}

#[async_trait]
impl Fetcher for WikipediaFetcher {
    async fn fetch(&self, max_items: usize) -> Result<Vec<SourceRecord>> {
        let json = self.body.read().await?;
        let mut out = parse_top(&self.project, &json)?;
        cap(&mut out, max_items, &self.project);
        Ok(out)
    }

    fn name(&self) -> &str {
        &self.project
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    #[test]
    fn day_path_is_zero_padded() {
        let d = OffsetDateTime::UNIX_EPOCH + Duration::days(40);
        assert_eq!(day_path(d).unwrap(), "1970/02/10");
    }

    #[test]
    fn titles_are_normalized_and_blank_ones_dropped() {
        let json = r#"{"items":[{"articles":[
            {"article":"Tom_&amp;_Jerry__(film)"},
            {"article":"_"}
        ]}]}"#;
        let recs = parse_top("en.wikipedia", json).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "Tom & Jerry (film)");
    }

    #[test]
    fn namespaced_and_front_page_are_skipped() {
        assert!(!is_content_article("Main_Page"));
        assert!(!is_content_article("Special:Search"));
        assert!(!is_content_article("-"));
        assert!(is_content_article("Taylor_Swift"));
    }
}
