//! Question normalization and canned small-talk answers

use regex::{Captures, Regex};
use std::collections::HashMap;

use crate::config::ClassifierConfig;
use crate::error::{Error, Result};

/// Lower-case, keep letters/digits/whitespace, collapse whitespace runs
fn canonicalize(text: &str) -> String {
    let filtered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decides whether a question gets a canned answer or goes to the documents
#[derive(Debug, Clone)]
pub struct QuestionClassifier {
    abbreviations: Option<Regex>,
    expansions: HashMap<String, String>,
    canned: HashMap<String, String>,
}

impl QuestionClassifier {
    /// Build from configuration.
    ///
    /// Table keys and abbreviations are canonicalized the same way questions
    /// are, so "what's your name" matches the question "What's your name?".
    /// An expansion may not itself contain an abbreviation.
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let expansions: HashMap<String, String> = config
            .abbreviations
            .iter()
            .map(|(short, expansion)| (canonicalize(short), canonicalize(expansion)))
            .filter(|(short, _)| !short.is_empty())
            .collect();

        let abbreviations = if expansions.is_empty() {
            None
        } else {
            let mut shorts: Vec<&str> = expansions.keys().map(String::as_str).collect();
            // Longest first so multi-word abbreviations win over their prefixes
            shorts.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
            let alternation = shorts
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = Regex::new(&format!(r"\b(?:{})\b", alternation))
                .map_err(|e| Error::Config(format!("Invalid abbreviations: {}", e)))?;

            for (short, expansion) in &expansions {
                if pattern.is_match(expansion) {
                    return Err(Error::Config(format!(
                        "Expansion of '{}' ('{}') contains an abbreviation",
                        short, expansion
                    )));
                }
            }
            Some(pattern)
        };

        let canned = config
            .canned_responses
            .iter()
            .map(|(phrase, answer)| (canonicalize(phrase), answer.clone()))
            .collect();

        Ok(Self {
            abbreviations,
            expansions,
            canned,
        })
    }

    /// Normalize a raw question for matching
    pub fn normalize(&self, question: &str) -> String {
        let normalized = canonicalize(question);
        let Some(pattern) = &self.abbreviations else {
            return normalized;
        };

        pattern
            .replace_all(&normalized, |caps: &Captures| {
                let short = &caps[0];
                self.expansions
                    .get(short)
                    .cloned()
                    .unwrap_or_else(|| short.to_string())
            })
            .into_owned()
    }

    /// The canned answer for an exactly matching normalized question
    pub fn classify(&self, normalized: &str) -> Option<&str> {
        self.canned.get(normalized).map(String::as_str)
    }

    /// Normalize and classify in one step
    pub fn canned_answer(&self, question: &str) -> Option<&str> {
        self.classify(&self.normalize(question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classifier() -> QuestionClassifier {
        QuestionClassifier::new(&ClassifierConfig::default()).unwrap()
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let c = classifier();
        assert_eq!(c.normalize("Hello!"), c.normalize("hello"));
        assert_eq!(c.normalize("  How   are\tyou?? "), "how are you");
    }

    #[test]
    fn test_canned_answers() {
        let c = classifier();
        assert_eq!(c.canned_answer("hi"), Some("Hi there! How can I help you?"));
        assert_eq!(c.canned_answer("HI!"), Some("Hi there! How can I help you?"));
        assert_eq!(c.canned_answer("Thanks."), Some("You're welcome!"));
        assert!(c.canned_answer("What's your name?").is_some());
    }

    #[test]
    fn test_near_miss_falls_through() {
        let c = classifier();
        assert_eq!(c.canned_answer("hi there"), None);
        assert_eq!(c.canned_answer("hello, what does the report say"), None);
    }

    #[test]
    fn test_abbreviation_expansion() {
        let c = classifier();
        assert_eq!(
            c.normalize("What is the BSL safety policy?"),
            "what is the bokaro steel plant safety policy"
        );
        assert_eq!(c.normalize("bsp"), "bokaro steel plant");
        // Only whole words are expanded
        assert_eq!(c.normalize("absl"), "absl");
    }

    #[test]
    fn test_custom_table_is_normalized() {
        let mut config = ClassifierConfig::default();
        config
            .canned_responses
            .insert("Who BUILT you?".to_string(), "A small team.".to_string());
        let c = QuestionClassifier::new(&config).unwrap();
        assert_eq!(c.canned_answer("who built you"), Some("A small team."));
    }

    #[test]
    fn test_chained_expansion_is_rejected() {
        let mut config = ClassifierConfig::default();
        config
            .abbreviations
            .insert("bsp".to_string(), "bsl x".to_string());
        let err = QuestionClassifier::new(&config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let mut config = ClassifierConfig::default();
        config
            .abbreviations
            .insert("plant".to_string(), "Bokaro Steel Plant".to_string());
        assert!(QuestionClassifier::new(&config).is_err());
    }

    #[test]
    fn test_multi_word_abbreviation() {
        let mut config = ClassifierConfig::default();
        config
            .abbreviations
            .insert("q a".to_string(), "quality assurance".to_string());
        let c = QuestionClassifier::new(&config).unwrap();
        assert_eq!(c.normalize("Q&A for BSL"), "qa for bokaro steel plant");
        assert_eq!(c.normalize("q a plan"), "quality assurance plan");
        assert_eq!(c.normalize(&c.normalize("q a plan")), "quality assurance plan");
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(q in "[a-zA-ZÀ-ÿ0-9 !?,.'\\-\t\n]{0,60}") {
            let c = classifier();
            let once = c.normalize(&q);
            prop_assert_eq!(c.normalize(&once), once);
        }

        #[test]
        fn prop_abbreviations_idempotent(
            words in proptest::collection::vec("(bsl|bsp|BSL|plant|steel|[a-z]{1,6})", 0..8)
        ) {
            let c = classifier();
            let once = c.normalize(&words.join(" "));
            prop_assert_eq!(c.normalize(&once), once);
        }
    }
}
