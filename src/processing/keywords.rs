//! Job description keyword extraction

use crate::processing::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Words that carry no signal in a job description.
pub const STOP_WORDS: [&str; 19] = [
    "and", "the", "for", "with", "that", "this", "from", "are", "use", "using", "will", "must",
    "should", "a", "an", "to", "of", "in", "on",
];

/// Normalized keyword to occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordMultiset {
    counts: HashMap<String, usize>,
}

impl KeywordMultiset {
    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut counts = HashMap::new();
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, keyword: &str) -> usize {
        self.counts.get(keyword).copied().unwrap_or(0)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.counts.contains_key(keyword)
    }

    /// Number of distinct keywords.
    pub fn distinct_count(&self) -> usize {
        self.counts.len()
    }

    /// Total keyword occurrences, duplicates included.
    pub fn total_count(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(keyword, count)| (keyword.as_str(), *count))
    }

    /// Keywords ordered by descending count, ties alphabetically.
    pub fn by_frequency(&self) -> Vec<(&str, usize)> {
        let mut keywords: Vec<(&str, usize)> = self.iter().collect();
        keywords.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        keywords
    }
}

pub struct KeywordExtractor {
    tokenizer: Tokenizer,
    stop_words: HashSet<&'static str>,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            stop_words: STOP_WORDS.into_iter().collect(),
        }
    }

    /// Build the keyword multiset of a job description.
    pub fn extract_keywords(&self, job_description: &str) -> KeywordMultiset {
        KeywordMultiset::from_tokens(
            self.tokenizer
                .tokenize(job_description)
                .into_iter()
                .filter(|token| !self.stop_words.contains(token.as_str())),
        )
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}
