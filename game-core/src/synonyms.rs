use std::sync::{Arc, LazyLock};

use game_types::RemoteError;
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;

use crate::WordSource;

// One or more tokens of ASCII letters, hyphens and apostrophes, separated by single spaces.
static SYNONYM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z'-]+(?: [A-Za-z'-]+)*$").expect("synonym pattern compiles")
});

/// Filters raw thesaurus output down to synonyms usable as hints.
pub struct SynonymFilter;

impl SynonymFilter {
    /// Check one candidate against the queried word
    pub fn is_valid(candidate: &str, word: &str) -> bool {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return false;
        }

        if candidate.to_lowercase() == word.trim().to_lowercase() {
            return false;
        }

        SYNONYM_PATTERN.is_match(candidate)
    }

    /// Keep valid candidates, trimmed, in the order received
    pub fn filter(word: &str, synonyms: &[String]) -> Vec<String> {
        synonyms
            .iter()
            .filter(|candidate| Self::is_valid(candidate, word))
            .map(|candidate| candidate.trim().to_string())
            .collect()
    }

    /// Uniformly random element of an already-filtered set.
    pub fn pick<'a, R: Rng + ?Sized>(valid: &'a [String], rng: &mut R) -> Option<&'a String> {
        valid.choose(rng)
    }
}

/// Queries the thesaurus for a word and returns only its valid synonyms.
#[derive(Clone)]
pub struct SynonymValidator {
    source: Arc<dyn WordSource>,
}

impl SynonymValidator {
    pub fn new(source: Arc<dyn WordSource>) -> Self {
        Self { source }
    }

    pub async fn validate(&self, word: &str) -> Result<Vec<String>, RemoteError> {
        let synonyms = self.source.synonyms(word).await?;
        let valid = SynonymFilter::filter(word, &synonyms);

        tracing::debug!(
            "'{}': {} of {} synonyms valid",
            word,
            valid.len(),
            synonyms.len()
        );

        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_mixed_candidates() {
        let synonyms = strings(&["run", "", "RUN", "sprint!", "go fast"]);
        assert_eq!(SynonymFilter::filter("run", &synonyms), vec!["go fast"]);
    }

    #[test]
    fn test_accepts_hyphen_and_apostrophe_tokens() {
        assert!(SynonymFilter::is_valid("well-known", "famous"));
        assert!(SynonymFilter::is_valid("o'clock", "time"));
        assert!(SynonymFilter::is_valid("make a run for it", "flee"));
    }

    #[test]
    fn test_rejects_bad_candidates() {
        // whitespace only
        assert!(!SynonymFilter::is_valid("   ", "run"));
        // digits and punctuation
        assert!(!SynonymFilter::is_valid("r2d2", "robot"));
        assert!(!SynonymFilter::is_valid("stop.", "halt"));
        // doubled inner space is not a single separator
        assert!(!SynonymFilter::is_valid("go  fast", "run"));
        // non-ASCII letters
        assert!(!SynonymFilter::is_valid("café", "bistro"));
        // self match, case-insensitive and after trimming
        assert!(!SynonymFilter::is_valid("  Run ", "run"));
    }

    #[test]
    fn test_filter_trims_and_keeps_order_and_duplicates() {
        let synonyms = strings(&[" dash ", "bolt", "dash"]);
        assert_eq!(
            SynonymFilter::filter("run", &synonyms),
            vec!["dash", "bolt", "dash"]
        );
    }

    #[test]
    fn test_pick_from_valid_set() {
        let mut rng = StdRng::seed_from_u64(7);
        let valid = strings(&["dash", "bolt", "sprint"]);

        for _ in 0..20 {
            let picked = SynonymFilter::pick(&valid, &mut rng).unwrap();
            assert!(valid.contains(picked));
        }

        assert!(SynonymFilter::pick(&[], &mut rng).is_none());
    }
}
