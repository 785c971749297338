// src/ingest/providers/mod.rs
//! One fetcher per source kind. Every provider can be built from an in-memory
//! body (fixtures, tests) or, with feature `ingest-http`, from a URL.

pub mod feed;
pub mod reddit;
pub mod trends;
pub mod wikipedia;
pub mod youtube;

use anyhow::Result;
#[cfg(feature = "ingest-http")]
use anyhow::Context;
use metrics::counter;

/// Where a provider gets its raw body from.
pub(crate) enum Body {
    // Own copy so tests don't need 'static fixtures.
    Fixture(String),
    #[cfg(feature = "ingest-http")]
    Http {
        url: String,
        client: reqwest::Client,
        headers: reqwest::header::HeaderMap,
    },
}

impl Body {
    pub(crate) fn fixture(s: &str) -> Self {
        Body::Fixture(s.to_string())
    }

    #[cfg(feature = "ingest-http")]
    pub(crate) fn http(url: impl Into<String>, client: &reqwest::Client) -> Self {
        Self::http_with_headers(url, client, reqwest::header::HeaderMap::new())
    }

    /// Credentials go in headers so they never show up in the URL, and
    /// therefore never in error chains or logs.
    #[cfg(feature = "ingest-http")]
    pub(crate) fn http_with_headers(
        url: impl Into<String>,
        client: &reqwest::Client,
        headers: reqwest::header::HeaderMap,
    ) -> Self {
        Body::Http {
            url: url.into(),
            client: client.clone(),
            headers,
        }
    }

    pub(crate) fn label(&self) -> &str {
        match self {
            Body::Fixture(_) => "fixture",
            #[cfg(feature = "ingest-http")]
            Body::Http { url, .. } => url,
        }
    }

    pub(crate) async fn read(&self) -> Result<String> {
        match self {
            Body::Fixture(s) => Ok(s.clone()),
            #[cfg(feature = "ingest-http")]
            Body::Http {
                url,
                client,
                headers,
            } => {
                let resp = client
                    .get(url.as_str())
                    .headers(headers.clone())
                    .send()
                    .await
                    .with_context(|| format!("GET {url}"))?
                    .error_for_status()
                    .with_context(|| format!("HTTP status for {url}"))?;
                resp.text()
                    .await
                    .with_context(|| format!("reading body of {url}"))
            }
        }
    }
}

/// Shared HTTP client for all providers of one run.
#[cfg(feature = "ingest-http")]
pub fn http_client(user_agent: &str, timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(std::time::Duration::from_secs(timeout_secs.max(1)))
        .build()
        .context("building http client")
}

/// Truncate one feed's items to `max_items`, counting what was cut.
pub(crate) fn cap<T>(items: &mut Vec<T>, max_items: usize, feed: &str) {
    if items.len() > max_items {
        let dropped = items.len() - max_items;
        items.truncate(max_items);
        tracing::debug!(feed, dropped, max_items, "feed capped");
        counter!("ingest_capped_total").increment(dropped as u64);
    }
}

/// Record parse timing the same way for every provider.
pub(crate) fn record_parse_ms(t0: std::time::Instant) {
    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    metrics::histogram!("ingest_parse_ms").record(ms);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_only_cuts_the_tail() {
        let mut v: Vec<u32> = (0..5).collect();
        cap(&mut v, 3, "t");
        assert_eq!(v, vec![0, 1, 2]);

        let mut short = vec![1, 2];
        cap(&mut short, 3, "t");
        assert_eq!(short, vec![1, 2]);
    }
}
