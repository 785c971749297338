// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyze::AnalysisConfig;
use crate::ingest::catalog::{default_catalog, BucketSpec};
use crate::snapshot::{SnapshotStore, DEFAULT_SNAPSHOT_PATH};

pub const ENV_CONFIG_PATH: &str = "TRENDS_CONFIG_PATH";
pub const ENV_SNAPSHOT_PATH: &str = "TRENDS_SNAPSHOT_PATH";
pub const ENV_YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";

fn default_snapshot_path() -> PathBuf {
    PathBuf::from(DEFAULT_SNAPSHOT_PATH)
}
fn default_max_items() -> usize {
    50
}
fn default_timeout_secs() -> u64 {
    20
}
fn default_user_agent() -> String {
    format!(
        "trend-pulse/{} (+https://github.com/trend-pulse)",
        env!("CARGO_PKG_VERSION")
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendsConfig {
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    /// Per upstream feed or subreddit, not per bucket.
    #[serde(default = "default_max_items")]
    pub max_items_per_source: usize,
    #[serde(default = "default_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub extra_stopwords: Vec<String>,
    #[serde(default)]
    pub report_vanished: bool,
    #[serde(default = "default_catalog")]
    pub buckets: Vec<BucketSpec>,
    /// Only ever from the environment; never written back out.
    #[serde(skip)]
    pub youtube_api_key: Option<String>,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            max_items_per_source: default_max_items(),
            http_timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            extra_stopwords: Vec::new(),
            report_vanished: false,
            buckets: default_catalog(),
            youtube_api_key: None,
        }
    }
}

impl TrendsConfig {
    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Load using env var + fallbacks, then apply env overrides:
    /// 1) $TRENDS_CONFIG_PATH
    /// 2) config/trends.toml
    /// 3) config/trends.json
    /// 4) built-in defaults
    pub fn load() -> Result<Self> {
        let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else if Path::new("config/trends.toml").exists() {
            Self::load_from(Path::new("config/trends.toml"))?
        } else if Path::new("config/trends.json").exists() {
            Self::load_from(Path::new("config/trends.json"))?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(p) = non_empty_env(ENV_SNAPSHOT_PATH) {
            self.snapshot_path = PathBuf::from(p);
        }
        self.youtube_api_key = non_empty_env(ENV_YOUTUBE_API_KEY);
        self
    }

    fn sanitized(mut self) -> Self {
        if self.max_items_per_source == 0 {
            self.max_items_per_source = default_max_items();
        }
        if self.http_timeout_secs == 0 {
            self.http_timeout_secs = default_timeout_secs();
        }
        if self.user_agent.trim().is_empty() {
            self.user_agent = default_user_agent();
        }
        self.extra_stopwords = clean_list(std::mem::take(&mut self.extra_stopwords));
        self.buckets.retain(|b| !b.name.trim().is_empty());
        self
    }

    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig {
            extra_stopwords: self.extra_stopwords.clone(),
            report_vanished: self.report_vanished,
        }
    }

    pub fn store(&self) -> SnapshotStore {
        SnapshotStore::new(self.snapshot_path.clone())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<TrendsConfig> {
    match hint_ext {
        "toml" => return toml::from_str(s).context("invalid TOML config"),
        "json" => return serde_json::from_str(s).context("invalid JSON config"),
        _ => {}
    }
    // Unknown extension: sniff.
    if let Ok(v) = serde_json::from_str(s) {
        return Ok(v);
    }
    toml::from_str(s).map_err(|e| anyhow!("unsupported config format: {e}"))
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    use std::collections::BTreeSet;
    let mut set = BTreeSet::new();
    for it in items {
        let t = it.trim().to_lowercase();
        if !t.is_empty() {
            set.insert(t);
        }
    }
    set.into_iter().collect()
}
