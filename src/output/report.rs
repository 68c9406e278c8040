//! Ranking report structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the ranked table. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub rank: usize,
    pub filename: String,
    /// Rounded to 2 decimal places.
    pub score: f64,
    pub matched_keywords: usize,
    pub freq_bonus: usize,
    pub char_count: usize,
}

/// Highest ranked resume that passed the threshold, with a text preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCandidate {
    pub result: RankedResult,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub total_documents: usize,
    /// Distinct job description keywords.
    pub keyword_count: usize,
    pub keyword_occurrences: usize,
    pub min_score: f64,
    /// Documents from which no text could be recovered.
    pub unreadable_documents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingReport {
    /// Sorted by score descending, dense-ranked, filtered to `score >= min_score`.
    pub results: Vec<RankedResult>,
    pub top_candidate: Option<TopCandidate>,
    pub metadata: ReportMetadata,
}

impl RankingReport {
    pub fn matching_count(&self) -> usize {
        self.results.len()
    }

    /// Summary line shown above the ranked table.
    pub fn summary_line(&self) -> String {
        format!(
            "Found {} resumes matching filter (>= {}%).",
            self.matching_count(),
            format_threshold(self.metadata.min_score)
        )
    }
}

/// Render a threshold without a trailing `.0` for whole numbers.
pub fn format_threshold(min_score: f64) -> String {
    if min_score.fract() == 0.0 {
        format!("{:.0}", min_score)
    } else {
        format!("{}", min_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(min_score: f64, rows: usize) -> RankingReport {
        RankingReport {
            results: (0..rows)
                .map(|i| RankedResult {
                    rank: i + 1,
                    filename: format!("r{}.txt", i),
                    score: 50.0,
                    matched_keywords: 1,
                    freq_bonus: 1,
                    char_count: 10,
                })
                .collect(),
            top_candidate: None,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                version: "test".to_string(),
                total_documents: rows,
                keyword_count: 3,
                keyword_occurrences: 4,
                min_score,
                unreadable_documents: Vec::new(),
            },
        }
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(report(50.0, 2).summary_line(), "Found 2 resumes matching filter (>= 50%).");
        assert_eq!(report(12.5, 0).summary_line(), "Found 0 resumes matching filter (>= 12.5%).");
    }
}
