// tests/ingest_dedup.rs
use trend_pulse::ingest::types::{SourceBucket, SourceRecord};
use trend_pulse::ingest::{dedupe, Corpus};

#[test]
fn same_title_different_case_keeps_first() {
    let raw = vec![
        SourceRecord::new("Alpha", "u1"),
        SourceRecord::new("alpha", "u2"),
        SourceRecord::new("Beta", "u3"),
    ];
    assert_eq!(
        dedupe(raw),
        vec![SourceRecord::new("Alpha", "u1"), SourceRecord::new("Beta", "u3")]
    );
}

#[test]
fn url_is_not_part_of_identity() {
    let raw = vec![
        SourceRecord::new("Same headline", "https://a.example/1"),
        SourceRecord::new("Same headline", "https://b.example/2"),
    ];
    let out = dedupe(raw);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].url, "https://a.example/1");
}

#[test]
fn dedupe_is_idempotent() {
    let raw = vec![
        SourceRecord::new("One", "a"),
        SourceRecord::new("Two", "b"),
        SourceRecord::new("ONE", "c"),
    ];
    let once = dedupe(raw);
    assert_eq!(dedupe(once.clone()), once);
}

#[test]
fn corpus_order_is_bucket_then_record() {
    let buckets = vec![
        SourceBucket::new(
            "x",
            vec![SourceRecord::new("x1", ""), SourceRecord::new("x2", "")],
        ),
        SourceBucket::new("y", vec![SourceRecord::new("y1", "")]),
    ];
    let corpus = Corpus::from_buckets(&buckets);
    let titles: Vec<&str> = corpus.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["x1", "x2", "y1"]);
}
