// src/analyze/ngrams.rs

/// Adjacent token pairs joined by a single space, in order.
/// Fewer than two tokens yields nothing.
pub fn bigrams<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    tokens
        .windows(2)
        .map(|w| format!("{} {}", w[0].as_ref(), w[1].as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_in_order() {
        assert_eq!(bigrams(&["a", "b", "c"]), vec!["a b", "b c"]);
    }

    #[test]
    fn short_inputs_are_empty() {
        assert!(bigrams::<&str>(&[]).is_empty());
        assert!(bigrams(&["solo"]).is_empty());
    }

    #[test]
    fn repeats_are_not_collapsed() {
        assert_eq!(bigrams(&["go", "go", "go"]), vec!["go go", "go go"]);
    }
}
