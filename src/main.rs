//! Trend snapshot: run-once entrypoint.
//! Fetches every configured source, computes keyword/bigram frequencies and
//! velocity against the previous snapshot, and rewrites the snapshot file.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trend_pulse::config::TrendsConfig;
use trend_pulse::ingest::BucketPlan;
use trend_pulse::{run_once, Pipeline};

/// Compact logs by default; `TRENDS_LOG_JSON=1` switches to JSON lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trend_pulse=info,warn"));

    let json = std::env::var("TRENDS_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[cfg(feature = "ingest-http")]
fn plans(cfg: &TrendsConfig) -> Result<Vec<BucketPlan>> {
    let client = trend_pulse::ingest::providers::http_client(&cfg.user_agent, cfg.http_timeout_secs)?;
    Ok(trend_pulse::ingest::catalog::build_plans(
        &cfg.buckets,
        &client,
        cfg.max_items_per_source,
        cfg.youtube_api_key.as_deref(),
    ))
}

// Without HTTP every bucket is empty and the placeholder snapshot is written.
#[cfg(not(feature = "ingest-http"))]
fn plans(cfg: &TrendsConfig) -> Result<Vec<BucketPlan>> {
    Ok(cfg
        .buckets
        .iter()
        .map(|b| BucketPlan {
            name: b.name.clone(),
            fetchers: Vec::new(),
        })
        .collect())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = TrendsConfig::load()?;
    tracing::info!(
        buckets = cfg.buckets.len(),
        snapshot = %cfg.snapshot_path.display(),
        "starting run"
    );

    let pipeline = Pipeline::new(&cfg.analysis());
    let plans = plans(&cfg)?;
    let snapshot = run_once(&pipeline, &plans, &cfg.store(), cfg.max_items_per_source).await?;

    tracing::info!(
        keywords = snapshot.keyword_frequencies.len(),
        top = snapshot
            .keyword_frequencies
            .first()
            .map(|k| k.term.as_str())
            .unwrap_or("-"),
        "done"
    );
    Ok(())
}
