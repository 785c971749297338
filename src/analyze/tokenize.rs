// src/analyze/tokenize.rs
//! Title → normalized word tokens.
//!
//! Steps, in order:
//! 1. lowercase
//! 2. delete URL-ish runs (`http…`, `www.…` up to the next whitespace)
//! 3. every char outside `[a-z0-9]`, whitespace, `-`, `#`, `_`, `+` becomes a space
//! 4. split on whitespace
//! 5. trim `-`, `_`, `+` from both ends
//! 6. keep if non-empty, not a stopword, not all digits, longer than 2
//!
//! Repeats inside one title are kept: emphasis counts.

use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::HashSet;

/// Tokens of this length or shorter are dropped.
pub const SHORT_TOKEN_MAX: usize = 2;

/// Short, common, non-semantic English tokens.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    // articles / determiners
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "each", "every", "all",
    "such", "other", "another",
    // pronouns
    "i", "me", "my", "mine", "we", "us", "our", "ours", "you", "your", "yours", "he", "him",
    "his", "she", "her", "hers", "it", "its", "they", "them", "their", "theirs", "who", "whom",
    "whose", "which", "what", "myself", "itself", "themselves",
    // conjunctions / prepositions
    "and", "or", "but", "nor", "so", "yet", "if", "then", "than", "because", "while", "as",
    "of", "to", "in", "on", "at", "by", "for", "with", "from", "into", "onto", "over", "under",
    "about", "after", "before", "between", "through", "during", "without", "within", "upon",
    "off", "out", "up", "down", "via",
    // auxiliaries / modals
    "is", "am", "are", "was", "were", "be", "been", "being", "do", "does", "did", "done",
    "have", "has", "had", "having", "will", "would", "shall", "should", "can", "could", "may",
    "might", "must", "get", "gets", "got",
    // adverbs / fillers
    "not", "no", "yes", "just", "also", "very", "too", "more", "most", "much", "many", "here",
    "there", "when", "where", "why", "how", "now", "still", "only", "even", "again", "ever",
    // feed noise
    "rt", "amp",
];

fn url_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"http\S+|www\.\S+").unwrap())
}

fn disallowed_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9\s\-#_+]").unwrap())
}

/// Stateless apart from its stopword set; cheap to share by reference.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: HashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_STOPWORDS.iter().copied())
    }
}

impl Tokenizer {
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: stopwords
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Default list plus `extra`.
    pub fn with_extra_stopwords<S: AsRef<str>>(extra: &[S]) -> Self {
        Self::new(
            DEFAULT_STOPWORDS
                .iter()
                .map(|s| s.to_string())
                .chain(extra.iter().map(|s| s.as_ref().to_string())),
        )
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let no_urls = url_re().replace_all(&lower, "");
        let cleaned = disallowed_re().replace_all(&no_urls, " ");

        cleaned
            .split_whitespace()
            .map(|w| w.trim_matches(|c| matches!(c, '-' | '_' | '+')))
            .filter(|w| self.keep(w))
            .map(str::to_string)
            .collect()
    }

    fn keep(&self, w: &str) -> bool {
        !w.is_empty()
            && w.len() > SHORT_TOKEN_MAX
            && !w.chars().all(|c| c.is_ascii_digit())
            && !self.is_stopword(w)
    }
}

/// Tokenize with the default stopword list.
pub fn tokenize(text: &str) -> Vec<String> {
    static DEFAULT: OnceCell<Tokenizer> = OnceCell::new();
    DEFAULT.get_or_init(Tokenizer::default).tokenize(text)
}
