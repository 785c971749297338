// src/ingest/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One headline-ish item produced by a fetcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceRecord {
    pub title: String, // normalized, never empty once it leaves a fetcher
    #[serde(default)]
    pub url: String,
}

impl SourceRecord {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Named, ordered group of records from one category of origin
/// (e.g. "major_outlets", "reddit").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceBucket {
    pub name: String,
    pub records: Vec<SourceRecord>,
}

impl SourceBucket {
    pub fn new(name: impl Into<String>, records: Vec<SourceRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A single upstream source. Implementations may fail freely; the ingest loop
/// turns any error into an empty contribution.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// At most `max_items` records per upstream feed. A fetcher reading
    /// several feeds caps each one, not the merged result.
    async fn fetch(&self, max_items: usize) -> Result<Vec<SourceRecord>>;
    fn name(&self) -> &str;
}
