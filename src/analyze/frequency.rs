// src/analyze/frequency.rs
//! Unigram and bigram tallies over a corpus, rank-ordered.
//!
//! Ordering is count descending; ties keep first-seen order (stable sort),
//! so a fixed input order always yields the same output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ngrams::bigrams;
use super::tokenize::Tokenizer;
use crate::ingest::types::SourceRecord;

/// A term (keyword or "w1 w2" bigram) with its occurrence count.
///
/// Serialized as a `[term, count]` pair; also reads `{keyword|bigram|term, count}`
/// objects written by older snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TermCountRepr", into = "(String, u64)")]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

pub type KeywordCount = TermCount;
pub type BigramCount = TermCount;

impl TermCount {
    pub fn new(term: impl Into<String>, count: u64) -> Self {
        Self {
            term: term.into(),
            count,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TermCountRepr {
    Pair(String, u64),
    Object {
        #[serde(alias = "keyword", alias = "bigram")]
        term: String,
        count: u64,
    },
}

impl From<TermCountRepr> for TermCount {
    fn from(r: TermCountRepr) -> Self {
        match r {
            TermCountRepr::Pair(term, count) => Self { term, count },
            TermCountRepr::Object { term, count } => Self { term, count },
        }
    }
}

impl From<TermCount> for (String, u64) {
    fn from(t: TermCount) -> Self {
        (t.term, t.count)
    }
}

/// Insertion-ordered counter.
#[derive(Debug, Default)]
pub struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<TermCount>,
}

impl Tally {
    pub fn add(&mut self, term: &str) {
        match self.index.get(term) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(term.to_string(), self.entries.len());
                self.entries.push(TermCount::new(term, 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count descending, first-seen order on ties.
    pub fn into_ranked(self) -> Vec<TermCount> {
        let mut v = self.entries;
        v.sort_by(|a, b| b.count.cmp(&a.count));
        v
    }
}

/// Ranked unigram + bigram lists for one corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frequencies {
    pub unigrams: Vec<KeywordCount>,
    pub bigrams: Vec<BigramCount>,
}

/// Tokenize every title once and count tokens and adjacent pairs.
/// Bigrams never span two titles.
pub fn tally(tokenizer: &Tokenizer, corpus: &[SourceRecord]) -> Frequencies {
    let mut uni = Tally::default();
    let mut bi = Tally::default();

    for rec in corpus {
        let tokens = tokenizer.tokenize(&rec.title);
        for t in &tokens {
            uni.add(t);
        }
        for b in bigrams(tokens.as_slice()) {
            bi.add(&b);
        }
    }

    tracing::debug!(unigrams = uni.len(), bigrams = bi.len(), "tally done");

    Frequencies {
        unigrams: uni.into_ranked(),
        bigrams: bi.into_ranked(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_keep_first_seen_order() {
        let mut t = Tally::default();
        for w in ["beta", "alpha", "gamma", "alpha", "beta", "delta"] {
            t.add(w);
        }
        let ranked = t.into_ranked();
        let terms: Vec<&str> = ranked.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(terms, vec!["beta", "alpha", "gamma", "delta"]);
        assert_eq!(ranked[0].count, 2);
    }

    #[test]
    fn bigrams_do_not_cross_titles() {
        let corpus = vec![
            SourceRecord::new("solar storm", ""),
            SourceRecord::new("storm warning", ""),
        ];
        let f = tally(&Tokenizer::default(), &corpus);
        let bis: Vec<&str> = f.bigrams.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(bis, vec!["solar storm", "storm warning"]);
        assert_eq!(f.unigrams[0], TermCount::new("storm", 2));
    }

    #[test]
    fn serializes_as_pair_and_reads_both_shapes() {
        let t = TermCount::new("fed", 4);
        assert_eq!(serde_json::to_string(&t).unwrap(), r#"["fed",4]"#);

        let pair: TermCount = serde_json::from_str(r#"["fed",4]"#).unwrap();
        let obj: TermCount = serde_json::from_str(r#"{"keyword":"fed","count":4}"#).unwrap();
        let big: TermCount = serde_json::from_str(r#"{"bigram":"fed cut","count":2}"#).unwrap();
        assert_eq!(pair, t);
        assert_eq!(obj, t);
        assert_eq!(big, TermCount::new("fed cut", 2));
    }
}
