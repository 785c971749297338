// src/analyze/mod.rs
//! Analysis core: tokenize titles, count words and pairs, compare with the
//! previous snapshot.

pub mod frequency;
pub mod ngrams;
pub mod tokenize;
pub mod velocity;

// Re-export convenient types.
pub use crate::analyze::frequency::{tally, BigramCount, Frequencies, KeywordCount, TermCount};
pub use crate::analyze::ngrams::bigrams;
pub use crate::analyze::tokenize::{tokenize, Tokenizer, DEFAULT_STOPWORDS};
pub use crate::analyze::velocity::{velocity, velocity_with, VelocityEntry};

/// Everything the analysis core needs, handed in at construction.
/// The core never reads the environment or the filesystem itself.
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    /// Added to [`DEFAULT_STOPWORDS`].
    pub extra_stopwords: Vec<String>,
    /// Also report keywords that disappeared since the previous run.
    pub report_vanished: bool,
}

impl AnalysisConfig {
    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::with_extra_stopwords(&self.extra_stopwords)
    }
}
