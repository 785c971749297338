// src/ingest/mod.rs
pub mod catalog;
pub mod providers;
pub mod types;

use crate::ingest::types::{Fetcher, SourceBucket, SourceRecord};
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use std::collections::HashSet;

/// One-time metrics registration (so series show up once a recorder is installed).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_records_total",
            "Records kept after normalization + per-bucket dedup."
        );
        describe_counter!(
            "ingest_dedup_total",
            "Records removed as same-title duplicates within a bucket."
        );
        describe_counter!(
            "ingest_capped_total",
            "Items cut by the per-feed max_items_per_source cap."
        );
        describe_counter!(
            "ingest_fetch_errors_total",
            "Fetcher errors degraded to an empty contribution."
        );
        describe_histogram!("ingest_parse_ms", "Fetcher parse time in milliseconds.");
    });
}

/// Normalize a raw title: decode entities, strip tags, fold quotes and whitespace.
pub fn normalize_title(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Curly quotes to ASCII
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace (includes NBSP)
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap: 500 chars
    if out.chars().count() > 500 {
        out = out.chars().take(500).collect();
    }

    out
}

/// Drop same-title records within one bucket. Identity is the lowercased
/// title; the URL is ignored. First occurrence wins, order is preserved.
pub fn dedupe(records: Vec<SourceRecord>) -> Vec<SourceRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let mut keep = Vec::with_capacity(records.len());
    for rec in records {
        if seen.insert(rec.title.to_lowercase()) {
            keep.push(rec);
        }
    }
    keep
}

/// Drop records with a blank title, then dedupe.
/// Returns (kept, blank_count, dedup_count).
pub fn prepare_bucket(records: Vec<SourceRecord>) -> (Vec<SourceRecord>, usize, usize) {
    let total = records.len();
    let non_blank: Vec<SourceRecord> = records
        .into_iter()
        .filter(|r| !r.title.trim().is_empty())
        .collect();
    let blank = total - non_blank.len();
    let before = non_blank.len();
    let kept = dedupe(non_blank);
    let dedup = before - kept.len();
    (kept, blank, dedup)
}

/// All records of one run, flattened in bucket order then record order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    pub records: Vec<SourceRecord>,
}

impl Corpus {
    /// Concatenate buckets. Cross-bucket duplicates are kept on purpose:
    /// bucket identity matters for per-source counts.
    pub fn from_buckets(buckets: &[SourceBucket]) -> Self {
        let total = buckets.iter().map(SourceBucket::len).sum();
        let mut records = Vec::with_capacity(total);
        for b in buckets {
            records.extend(
                b.records
                    .iter()
                    .filter(|r| !r.title.trim().is_empty())
                    .cloned(),
            );
        }
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Fetchers that feed one bucket.
pub struct BucketPlan {
    pub name: String,
    pub fetchers: Vec<Box<dyn Fetcher>>,
}

/// Run one fetcher, degrading any failure to an empty vec.
/// `max_items` is handed down as the per-feed cap.
pub async fn fetch_or_empty(fetcher: &dyn Fetcher, max_items: usize) -> Vec<SourceRecord> {
    match fetcher.fetch(max_items).await {
        Ok(v) => {
            tracing::info!(source = fetcher.name(), items = v.len(), "fetched");
            v
        }
        Err(e) => {
            tracing::warn!(error = ?e, source = fetcher.name(), "fetch failed, using empty");
            counter!("ingest_fetch_errors_total").increment(1);
            Vec::new()
        }
    }
}

/// Run every plan once and return deduplicated buckets in plan order.
/// Never fails: a bucket whose fetchers all fail is simply empty.
pub async fn collect_buckets(plans: &[BucketPlan], max_items: usize) -> Vec<SourceBucket> {
    ensure_metrics_described();

    let mut out = Vec::with_capacity(plans.len());
    for plan in plans {
        let mut raw = Vec::new();
        for f in &plan.fetchers {
            raw.append(&mut fetch_or_empty(f.as_ref(), max_items).await);
        }

        let (kept, blank, dedup) = prepare_bucket(raw);
        counter!("ingest_records_total").increment(kept.len() as u64);
        counter!("ingest_dedup_total").increment(dedup as u64);

        tracing::info!(
            target: "ingest",
            bucket = %plan.name,
            kept = kept.len(),
            blank,
            dedup,
            "bucket collected"
        );
        out.push(SourceBucket::new(plan.name.clone(), kept));
    }
    out
}
