// tests/pipeline_e2e.rs
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use trend_pulse::ingest::providers::{feed::FeedFetcher, reddit::RedditFetcher};
use trend_pulse::ingest::BucketPlan;
use trend_pulse::{run_once, AnalysisConfig, Pipeline, SnapshotStore, SourceBucket, SourceRecord};

const NEWS_XML: &str = include_str!("fixtures/news_rss.xml");
const REDDIT_XML: &str = include_str!("fixtures/reddit_atom.xml");

fn counts(list: &[trend_pulse::analyze::TermCount]) -> HashMap<&str, u64> {
    list.iter().map(|t| (t.term.as_str(), t.count)).collect()
}

#[test]
fn duplicate_title_across_buckets_counts_twice() {
    let buckets = vec![
        SourceBucket::new("a", vec![SourceRecord::new("Big News Today", "x")]),
        SourceBucket::new("b", vec![SourceRecord::new("Big News Today", "y")]),
    ];
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap();
    let snap = Pipeline::default().run(buckets, None, now);

    assert_eq!(
        counts(&snap.keyword_frequencies),
        HashMap::from([("big", 2), ("news", 2), ("today", 2)])
    );
    assert_eq!(
        counts(&snap.bigram_frequencies),
        HashMap::from([("big news", 2), ("news today", 2)])
    );
    assert_eq!(snap.source_counts["a"], 1);
    assert_eq!(snap.source_counts["b"], 1);
}

#[test]
fn extra_stopwords_flow_through_config() {
    let cfg = AnalysisConfig {
        extra_stopwords: vec!["news".into()],
        report_vanished: false,
    };
    let buckets = vec![SourceBucket::new(
        "a",
        vec![SourceRecord::new("Big News Today", "x")],
    )];
    let snap = Pipeline::new(&cfg).run(buckets, None, Utc::now());
    assert!(snap.keyword_frequencies.iter().all(|k| k.term != "news"));
    assert_eq!(snap.bigram_frequencies[0].term, "big today");
}

fn plans() -> Vec<BucketPlan> {
    vec![
        BucketPlan {
            name: "major_outlets".into(),
            fetchers: vec![Box::new(FeedFetcher::from_fixture("major_outlets", NEWS_XML))],
        },
        BucketPlan {
            name: "reddit".into(),
            fetchers: vec![Box::new(RedditFetcher::from_fixtures(&[("news", REDDIT_XML)]))],
        },
        BucketPlan {
            name: "tech".into(),
            fetchers: vec![],
        },
    ]
}

#[tokio::test]
async fn second_run_reports_velocity_against_first() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("data/trends.json"));
    let pipeline = Pipeline::default();

    // Cold start: every keyword's delta is its count.
    let first = run_once(&pipeline, &plans(), &store, 50).await.unwrap();
    assert_eq!(first.source_counts["major_outlets"], 2);
    assert_eq!(first.source_counts["reddit"], 2);
    assert_eq!(first.source_counts["tech"], 0);
    assert_eq!(first.keyword_velocity.len(), first.keyword_frequencies.len());
    assert_eq!(
        counts(&first.keyword_frequencies).get("storm"),
        Some(&2)
    );

    // Same inputs again: nothing moved.
    let second = run_once(&pipeline, &plans(), &store, 50).await.unwrap();
    assert_eq!(second.keyword_frequencies, first.keyword_frequencies);
    assert!(second.keyword_velocity.is_empty());
}

#[tokio::test]
async fn all_sources_down_still_writes_a_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("trends.json"));
    let plans = vec![
        BucketPlan {
            name: "a".into(),
            fetchers: vec![Box::new(FeedFetcher::from_fixture("a", "garbage"))],
        },
        BucketPlan {
            name: "b".into(),
            fetchers: vec![],
        },
    ];

    let snap = run_once(&Pipeline::default(), &plans, &store, 50).await.unwrap();
    assert!(!snap.sources.is_empty());
    assert!(!snap.keyword_frequencies.is_empty());
    assert!(snap.bigram_frequencies.is_empty());
    assert!(snap.keyword_velocity.is_empty());
    assert!(store.load().await.is_some());
}
