//! Word-boundary tokenization shared by the keyword extractor and the scorer

use regex::Regex;

/// Tokens must be longer than this many characters to count.
pub const MIN_TOKEN_CHARS: usize = 2;

pub struct Tokenizer {
    word_regex: Regex,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        // Letters, numbers and underscore in any script. Combining marks split words.
        let word_regex = Regex::new(r"[\p{L}\p{N}_]+").expect("Invalid word regex");

        Self { word_regex }
    }

    /// Lowercase `text` and return every word longer than [`MIN_TOKEN_CHARS`].
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.word_regex
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|word| word.chars().count() > MIN_TOKEN_CHARS)
            .map(str::to_string)
            .collect()
    }
}
