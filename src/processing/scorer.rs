//! Keyword overlap scoring of a resume against job description keywords

use crate::processing::keywords::KeywordMultiset;
use crate::processing::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};

/// Share of the score earned by covering distinct keywords.
pub const COVERAGE_WEIGHT: f64 = 0.8;
/// Share of the score earned by repeating keywords.
pub const FREQUENCY_WEIGHT: f64 = 0.2;
/// The frequency bonus is normalized by this multiple of total keyword occurrences.
pub const FREQUENCY_SCALE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Unrounded score in `[0, 100]`.
    pub score: f64,
    /// Distinct keywords present at least once in the resume.
    pub matched: usize,
    /// Sum over matched keywords of `min(resume_count, jd_count)`.
    pub freq_bonus: usize,
}

impl ScoreBreakdown {
    pub const ZERO: ScoreBreakdown = ScoreBreakdown {
        score: 0.0,
        matched: 0,
        freq_bonus: 0,
    };
}

pub struct Scorer {
    tokenizer: Tokenizer,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorer {
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
        }
    }

    pub fn score(&self, resume_text: &str, keywords: &KeywordMultiset) -> ScoreBreakdown {
        if keywords.is_empty() {
            return ScoreBreakdown::ZERO;
        }

        // Stop words never reach the keyword set, so the resume side is not filtered
        let resume_counts = KeywordMultiset::from_tokens(self.tokenizer.tokenize(resume_text));

        let mut matched = 0;
        let mut freq_bonus = 0;
        for (keyword, jd_count) in keywords.iter() {
            let resume_count = resume_counts.count(keyword);
            if resume_count > 0 {
                matched += 1;
                freq_bonus += resume_count.min(jd_count);
            }
        }

        let total_keywords = keywords.total_count();
        if total_keywords == 0 {
            return ScoreBreakdown {
                score: 0.0,
                matched,
                freq_bonus,
            };
        }

        let overlap_ratio = matched as f64 / keywords.distinct_count() as f64;
        let normalized_bonus = freq_bonus as f64 / (total_keywords as f64 * FREQUENCY_SCALE);
        let raw_score = overlap_ratio * COVERAGE_WEIGHT + normalized_bonus * FREQUENCY_WEIGHT;

        ScoreBreakdown {
            score: raw_score * 100.0,
            matched,
            freq_bonus,
        }
    }
}
