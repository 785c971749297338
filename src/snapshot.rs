// src/snapshot.rs
//! The persisted/emitted document of one run, its builder, and the JSON store.
//!
//! JSON shape:
//! {
//!   "generated_at": "2026-10-16T06:00:00Z",
//!   "sources": { "reddit": [ { "title": "...", "url": "..." } ] },
//!   "source_counts": { "reddit": 1 },
//!   "keyword_frequencies": [ ["storm", 4] ],
//!   "bigram_frequencies": [ ["solar storm", 2] ],
//!   "keyword_velocity": [ { "keyword": "storm", "delta": 3 } ]
//! }
//!
//! Reading is lenient: missing fields default to empty, frequency entries
//! may be pairs or objects, sources may be plain title strings.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::analyze::{BigramCount, KeywordCount, TermCount, VelocityEntry};
use crate::ingest::types::{SourceBucket, SourceRecord};

pub const DEFAULT_SNAPSHOT_PATH: &str = "data/trends.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(
        serialize_with = "ser_generated_at",
        deserialize_with = "de_generated_at",
        default
    )]
    pub generated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "de_sources")]
    pub sources: BTreeMap<String, Vec<SourceRecord>>,
    #[serde(default)]
    pub source_counts: BTreeMap<String, usize>,
    #[serde(default)]
    pub keyword_frequencies: Vec<KeywordCount>,
    #[serde(default)]
    pub bigram_frequencies: Vec<BigramCount>,
    #[serde(default)]
    pub keyword_velocity: Vec<VelocityEntry>,
}

impl Snapshot {
    /// True for the fallback document written when every bucket was empty.
    pub fn is_placeholder(&self) -> bool {
        self.keyword_frequencies == placeholder_keywords() && self.sources == placeholder_sources()
    }
}

fn ser_generated_at<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
}

// RFC 3339, or a naive ISO timestamp taken as UTC; anything else falls back to the epoch.
fn de_generated_at<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
    let parsed = DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|n| n.and_utc())
        });
    Ok(parsed.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordRepr {
    Full(SourceRecord),
    Title(String),
}

fn de_sources<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<BTreeMap<String, Vec<SourceRecord>>, D::Error> {
    let raw = BTreeMap::<String, Vec<RecordRepr>>::deserialize(d)?;
    Ok(raw
        .into_iter()
        .map(|(bucket, recs)| {
            let recs = recs
                .into_iter()
                .map(|r| match r {
                    RecordRepr::Full(rec) => rec,
                    RecordRepr::Title(title) => SourceRecord::new(title, ""),
                })
                .collect();
            (bucket, recs)
        })
        .collect())
}

/// Shown when every bucket came back empty, so consumers always get a
/// non-empty document.
pub fn placeholder_sources() -> BTreeMap<String, Vec<SourceRecord>> {
    let mut m = BTreeMap::new();
    m.insert(
        "example".to_string(),
        vec![
            SourceRecord::new(
                "Sample headline: markets open the week higher",
                "https://example.com/markets",
            ),
            SourceRecord::new(
                "Sample headline: storm season outlook",
                "https://example.com/weather",
            ),
            SourceRecord::new(
                "Sample headline: new phone launch draws crowds",
                "https://example.com/tech",
            ),
        ],
    );
    m
}

pub fn placeholder_keywords() -> Vec<KeywordCount> {
    vec![
        TermCount::new("example", 3),
        TermCount::new("trends", 2),
        TermCount::new("placeholder", 1),
    ]
}

/// Assemble the run's document.
///
/// `buckets` are expected to be deduplicated already; `source_counts` is
/// their element count. If no bucket has any record, `sources` and
/// `keyword_frequencies` are replaced by the placeholder; bigrams and
/// velocity stay as given (empty in that case).
pub fn build(
    buckets: &[SourceBucket],
    unigrams: Vec<KeywordCount>,
    bigrams: Vec<BigramCount>,
    velocity: Vec<VelocityEntry>,
    now: DateTime<Utc>,
) -> Snapshot {
    let mut sources: BTreeMap<String, Vec<SourceRecord>> = BTreeMap::new();
    let mut source_counts: BTreeMap<String, usize> = BTreeMap::new();
    for b in buckets {
        sources
            .entry(b.name.clone())
            .or_default()
            .extend(b.records.iter().cloned());
        *source_counts.entry(b.name.clone()).or_default() += b.len();
    }

    let corpus_empty = buckets.iter().all(SourceBucket::is_empty);
    let (sources, keyword_frequencies) = if corpus_empty {
        tracing::warn!("all buckets empty, emitting placeholder snapshot");
        (placeholder_sources(), placeholder_keywords())
    } else {
        (sources, unigrams)
    };

    Snapshot {
        generated_at: now,
        sources,
        source_counts,
        keyword_frequencies,
        bigram_frequencies: bigrams,
        keyword_velocity: velocity,
    }
}

/// The single JSON file carried from one run to the next.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_PATH)
    }
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Previous snapshot, or `None` if it is missing or unreadable. Never fails.
    pub async fn load(&self) -> Option<Snapshot> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no previous snapshot");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "read snapshot: {e:#}");
                return None;
            }
        };
        match serde_json::from_str::<Snapshot>(&raw) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "malformed snapshot ignored: {e:#}");
                None
            }
        }
    }

    /// Pretty JSON, written to a sibling temp file and renamed over the target.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let mut body = serde_json::to_vec_pretty(snapshot).context("encoding snapshot")?;
        body.push(b'\n');

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &body)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}
