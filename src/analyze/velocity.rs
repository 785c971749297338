// src/analyze/velocity.rs
//! Per-keyword count change against the previous snapshot.
//!
//! Only keywords in the current tally are reported unless `report_vanished`
//! is set; a keyword that drops to zero is otherwise invisible rather than
//! showing up with a negative delta.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::frequency::KeywordCount;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VelocityEntry {
    pub keyword: String,
    pub delta: i64,
}

fn previous_lookup(previous: Option<&Snapshot>) -> HashMap<&str, u64> {
    let mut map = HashMap::new();
    if let Some(prev) = previous {
        for kc in &prev.keyword_frequencies {
            map.entry(kc.term.as_str()).or_insert(kc.count);
        }
    }
    map
}

fn signed(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// `current - previous` for each current keyword, zero deltas dropped,
/// sorted by delta descending (ties keep `current` order).
pub fn velocity(current: &[KeywordCount], previous: Option<&Snapshot>) -> Vec<VelocityEntry> {
    velocity_with(current, previous, false)
}

/// Same as [`velocity`]; with `report_vanished`, keywords present only in the
/// previous snapshot are appended with `delta = -previous_count` before sorting.
pub fn velocity_with(
    current: &[KeywordCount],
    previous: Option<&Snapshot>,
    report_vanished: bool,
) -> Vec<VelocityEntry> {
    let prev = previous_lookup(previous);

    let mut out: Vec<VelocityEntry> = current
        .iter()
        .map(|kc| VelocityEntry {
            keyword: kc.term.clone(),
            delta: signed(kc.count) - signed(prev.get(kc.term.as_str()).copied().unwrap_or(0)),
        })
        .filter(|v| v.delta != 0)
        .collect();

    if report_vanished {
        if let Some(p) = previous {
            let now: HashSet<&str> = current.iter().map(|kc| kc.term.as_str()).collect();
            let mut emitted: HashSet<&str> = HashSet::new();
            for kc in &p.keyword_frequencies {
                let k = kc.term.as_str();
                if kc.count > 0 && !now.contains(k) && emitted.insert(k) {
                    out.push(VelocityEntry {
                        keyword: kc.term.clone(),
                        delta: -signed(prev.get(k).copied().unwrap_or(kc.count)),
                    });
                }
            }
        }
    }

    out.sort_by(|a, b| b.delta.cmp(&a.delta));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::frequency::TermCount;

    fn snap(kws: &[(&str, u64)]) -> Snapshot {
        Snapshot {
            keyword_frequencies: kws.iter().map(|(k, c)| TermCount::new(*k, *c)).collect(),
            ..Snapshot::default()
        }
    }

    #[test]
    fn rising_new_and_falling_are_ordered() {
        let current = vec![
            TermCount::new("storm", 5),
            TermCount::new("rates", 3),
            TermCount::new("vote", 2),
            TermCount::new("same", 1),
        ];
        let prev = snap(&[("rates", 4), ("storm", 1), ("same", 1), ("gone", 7)]);
        let v = velocity(&current, Some(&prev));
        assert_eq!(
            v,
            vec![
                VelocityEntry { keyword: "storm".into(), delta: 4 },
                VelocityEntry { keyword: "vote".into(), delta: 2 },
                VelocityEntry { keyword: "rates".into(), delta: -1 },
            ]
        );
    }

    #[test]
    fn vanished_keywords_only_when_asked() {
        let current = vec![TermCount::new("storm", 2)];
        let prev = snap(&[("gone", 3), ("storm", 2)]);
        assert!(velocity(&current, Some(&prev)).is_empty());
        assert_eq!(
            velocity_with(&current, Some(&prev), true),
            vec![VelocityEntry { keyword: "gone".into(), delta: -3 }]
        );
    }
}
