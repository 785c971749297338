// tests/analyze_velocity.rs
use trend_pulse::analyze::{velocity, velocity_with, TermCount, VelocityEntry};
use trend_pulse::Snapshot;

fn current() -> Vec<TermCount> {
    vec![
        TermCount::new("storm", 6),
        TermCount::new("rates", 4),
        TermCount::new("election", 4),
        TermCount::new("bank", 1),
    ]
}

fn previous() -> Snapshot {
    Snapshot {
        keyword_frequencies: vec![
            TermCount::new("rates", 4),
            TermCount::new("bank", 3),
            TermCount::new("storm", 1),
            TermCount::new("vanished", 9),
        ],
        ..Snapshot::default()
    }
}

#[test]
fn cold_start_delta_equals_count() {
    let v = velocity(&current(), None);
    assert_eq!(v.len(), 4);
    for (entry, kc) in v.iter().zip(current()) {
        assert_eq!(entry.keyword, kc.term);
        assert_eq!(entry.delta, kc.count as i64);
    }
}

#[test]
fn unchanged_counts_are_filtered_out() {
    let v = velocity(&current(), Some(&previous()));
    assert!(v.iter().all(|e| e.keyword != "rates"));
    assert!(v.iter().all(|e| e.delta != 0));
}

#[test]
fn sorted_by_delta_descending() {
    let v = velocity(&current(), Some(&previous()));
    assert_eq!(
        v,
        vec![
            VelocityEntry { keyword: "storm".into(), delta: 5 },
            VelocityEntry { keyword: "election".into(), delta: 4 },
            VelocityEntry { keyword: "bank".into(), delta: -2 },
        ]
    );
}

#[test]
fn vanished_keywords_are_invisible_by_default() {
    let v = velocity(&current(), Some(&previous()));
    assert!(v.iter().all(|e| e.keyword != "vanished"));

    let full = velocity_with(&current(), Some(&previous()), true);
    assert_eq!(
        full.last(),
        Some(&VelocityEntry { keyword: "vanished".into(), delta: -9 })
    );
}

#[test]
fn empty_previous_snapshot_behaves_like_cold_start() {
    let empty = Snapshot::default();
    assert_eq!(velocity(&current(), Some(&empty)), velocity(&current(), None));
}

#[test]
fn equal_deltas_put_current_keywords_before_vanished_ones() {
    let current = vec![TermCount::new("flood", 2), TermCount::new("bank", 1)];
    let prev = Snapshot {
        keyword_frequencies: vec![
            TermCount::new("gone", 3),
            TermCount::new("bank", 4),
            TermCount::new("lost", 3),
        ],
        ..Snapshot::default()
    };
    assert_eq!(
        velocity_with(&current, Some(&prev), true),
        vec![
            VelocityEntry { keyword: "flood".into(), delta: 2 },
            VelocityEntry { keyword: "bank".into(), delta: -3 },
            VelocityEntry { keyword: "gone".into(), delta: -3 },
            VelocityEntry { keyword: "lost".into(), delta: -3 },
        ]
    );
}
