// src/ingest/providers/feed.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;

use super::{cap, record_parse_ms, Body};
use crate::ingest::normalize_title;
use crate::ingest::types::{Fetcher, SourceRecord};

// --- RSS 2.0 ---

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
}

// --- Atom (reddit serves this from its .rss endpoints) ---

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    link: Vec<AtomLink>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

impl AtomEntry {
    fn href(&self) -> Option<String> {
        self.link
            .iter()
            .find(|l| l.rel.as_deref().unwrap_or("alternate") == "alternate")
            .or_else(|| self.link.first())
            .and_then(|l| l.href.clone())
    }
}

/// Title + link of one feed entry, title already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: Option<String>,
}

/// Parse an RSS 2.0 or Atom document. Entries whose title normalizes to
/// empty are skipped.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedItem>> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(xml);

    let raw: Vec<(Option<String>, Option<String>)> = match from_str::<Rss>(&xml_clean) {
        Ok(rss) => rss
            .channel
            .item
            .into_iter()
            .map(|it| (it.title, it.link))
            .collect(),
        Err(rss_err) if !xml_clean.contains("<feed") => {
            return Err(anyhow!("rss: {rss_err}")).context("parsing feed xml");
        }
        Err(rss_err) => {
            let atom: AtomFeed = from_str(&xml_clean)
                .map_err(|atom_err| anyhow!("rss: {rss_err}; atom: {atom_err}"))
                .context("parsing feed xml")?;
            atom.entry
                .into_iter()
                .map(|e| {
                    let href = e.href();
                    (e.title.map(|t| t.value), href)
                })
                .collect()
        }
    };

    let out = raw
        .into_iter()
        .filter_map(|(title, link)| {
            let title = normalize_title(title.as_deref().unwrap_or_default());
            if title.is_empty() {
                return None;
            }
            let link = link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty());
            Some(FeedItem { title, link })
        })
        .collect();

    record_parse_ms(t0);
    Ok(out)
}

/// Generic syndication feed source. Several URLs may feed one fetcher; each
/// is capped on its own, and a failing URL is skipped as long as at least
/// one other one answers.
pub struct FeedFetcher {
    name: String,
    bodies: Vec<Body>,
}

impl FeedFetcher {
    pub fn from_fixture(name: impl Into<String>, xml: &str) -> Self {
        Self {
            name: name.into(),
            bodies: vec![Body::fixture(xml)],
        }
    }

    /// One body per feed, as if each came from its own URL.
    pub fn from_fixtures(name: impl Into<String>, xmls: &[&str]) -> Self {
        Self {
            name: name.into(),
            bodies: xmls.iter().map(|x| Body::fixture(x)).collect(),
        }
    }

    #[cfg(feature = "ingest-http")]
    pub fn from_urls(name: impl Into<String>, urls: &[String], client: &reqwest::Client) -> Self {
        Self {
            name: name.into(),
            bodies: urls.iter().map(|u| Body::http(u.as_str(), client)).collect(),
        }
    }
}

#[async_trait]
impl Fetcher for FeedFetcher {
    async fn fetch(&self, max_items: usize) -> Result<Vec<SourceRecord>> {
        let mut out = Vec::new();
        let mut last_err = None;
        for body in &self.bodies {
            match body.read().await.and_then(|xml| parse_feed(&xml)) {
                Ok(mut items) => {
                    cap(&mut items, max_items, body.label());
                    out.extend(
                        items
                            .into_iter()
                            .map(|it| SourceRecord::new(it.title, it.link.unwrap_or_default())),
                    );
                }
                Err(e) => {
                    tracing::warn!(error = ?e, source = %self.name, feed = body.label(), "feed skipped");
                    last_err = Some(e);
                }
            }
        }
        match last_err {
            Some(e) if out.is_empty() => Err(e),
            _ => Ok(out),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Named HTML entities are not valid XML; map the common ones before parsing.
pub(crate) fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rss_items_are_parsed_and_blank_titles_dropped() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>T</title>
<item><title>First &amp; foremost</title><link>https://a.example/1</link></item>
<item><title>   </title><link>https://a.example/2</link></item>
<item><title><![CDATA[Third <b>one</b>]]></title></item>
</channel></rss>"#;
        let items = parse_feed(xml).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "First & foremost");
        assert_eq!(items[0].link.as_deref(), Some("https://a.example/1"));
        assert_eq!(items[1].title, "Third one");
        assert_eq!(items[1].link, None);
    }

    #[test]
    fn atom_entries_use_alternate_href() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
<title>r/news</title>
<entry><title>Storm hits coast</title><link href="https://www.reddit.com/r/news/1"/></entry>
<entry><title type="html">Rates &amp;amp; yields</title><link rel="alternate" href="https://www.reddit.com/r/news/2"/></entry>
</feed>"#;
        let items = parse_feed(xml).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].link.as_deref(), Some("https://www.reddit.com/r/news/1"));
        assert_eq!(items[1].title, "Rates & yields");
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_feed("<html><body>nope</body></html>").is_err());
    }

    #[tokio::test]
    async fn each_feed_is_capped_separately() {
        let a = r#"<rss><channel>
<item><title>Alpha one</title></item><item><title>Alpha two</title></item><item><title>Alpha three</title></item>
</channel></rss>"#;
        let b = r#"<rss><channel>
<item><title>Beta one</title></item><item><title>Beta two</title></item>
</channel></rss>"#;
        let f = FeedFetcher::from_fixtures("pair", &[a, b]);
        let titles: Vec<String> = f.fetch(2).await.unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Alpha one", "Alpha two", "Beta one", "Beta two"]);
    }

    #[tokio::test]
    async fn all_bodies_failing_is_an_error() {
        let f = FeedFetcher::from_fixture("broken", "<html>nope</html>");
        assert!(f.fetch(50).await.is_err());
    }
}
