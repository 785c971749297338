// src/pipeline.rs
//! buckets → dedup → corpus → tally → velocity → snapshot.

use anyhow::Result;
use chrono::{DateTime, Utc};
use metrics::{describe_gauge, gauge};
use once_cell::sync::OnceCell;

use crate::analyze::{tally, velocity_with, AnalysisConfig, Tokenizer};
use crate::ingest::types::SourceBucket;
use crate::ingest::{collect_buckets, prepare_bucket, BucketPlan, Corpus};
use crate::snapshot::{build, Snapshot, SnapshotStore};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the trends pipeline last wrote a snapshot."
        );
    });
}

/// The pure analysis core. Holds only configuration; one value can serve
/// any number of runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    tokenizer: Tokenizer,
    report_vanished: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl Pipeline {
    pub fn new(cfg: &AnalysisConfig) -> Self {
        Self {
            tokenizer: cfg.tokenizer(),
            report_vanished: cfg.report_vanished,
        }
    }

    /// Compute the snapshot for `buckets` given the prior one.
    /// Deterministic for a fixed input; never fails.
    pub fn run(
        &self,
        buckets: Vec<SourceBucket>,
        previous: Option<&Snapshot>,
        now: DateTime<Utc>,
    ) -> Snapshot {
        let buckets: Vec<SourceBucket> = buckets
            .into_iter()
            .map(|b| SourceBucket::new(b.name, prepare_bucket(b.records).0))
            .collect();

        // Synthetic placeholder counts would all read as vanished.
        let previous = match previous {
            Some(p) if self.report_vanished && p.is_placeholder() => {
                tracing::debug!("previous snapshot is the placeholder, not used as baseline");
                None
            }
            other => other,
        };

        let corpus = Corpus::from_buckets(&buckets);
        let freqs = tally(&self.tokenizer, &corpus.records);
        let vel = velocity_with(&freqs.unigrams, previous, self.report_vanished);

        tracing::info!(
            records = corpus.len(),
            keywords = freqs.unigrams.len(),
            bigrams = freqs.bigrams.len(),
            velocity = vel.len(),
            cold_start = previous.is_none(),
            "snapshot computed"
        );

        build(&buckets, freqs.unigrams, freqs.bigrams, vel, now)
    }
}

/// Fetch every bucket, read the previous snapshot, compute, write.
/// Only a failed write is an error; fetch and read problems degrade.
pub async fn run_once(
    pipeline: &Pipeline,
    plans: &[BucketPlan],
    store: &SnapshotStore,
    max_items_per_source: usize,
) -> Result<Snapshot> {
    ensure_metrics_described();

    let buckets = collect_buckets(plans, max_items_per_source).await;
    let previous = store.load().await;
    let now = Utc::now();

    let snapshot = pipeline.run(buckets, previous.as_ref(), now);
    store.save(&snapshot).await?;

    gauge!("pipeline_last_run_ts").set(now.timestamp().max(0) as f64);
    tracing::info!(path = %store.path().display(), "snapshot written");
    Ok(snapshot)
}
