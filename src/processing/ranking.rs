//! Ranking engine: extract, score, sort, dense-rank and filter a batch of resumes

use crate::error::{Result, ResumeRankerError};
use crate::output::report::{RankedResult, RankingReport, ReportMetadata, TopCandidate};
use crate::processing::document::{ExtractedDocument, RawDocument};
use crate::processing::keywords::{KeywordExtractor, KeywordMultiset};
use crate::processing::scorer::Scorer;
use chrono::Utc;
use log::{debug, info};

/// Default length of the top candidate preview, in characters.
pub const DEFAULT_PREVIEW_CHARS: usize = 10_000;

pub struct RankingEngine {
    keyword_extractor: KeywordExtractor,
    scorer: Scorer,
    preview_chars: usize,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingEngine {
    pub fn new() -> Self {
        Self {
            keyword_extractor: KeywordExtractor::new(),
            scorer: Scorer::new(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn keywords(&self, job_description: &str) -> KeywordMultiset {
        self.keyword_extractor.extract_keywords(job_description)
    }

    /// Rank `documents` against `job_description`. Ranks are assigned before
    /// the `min_score` filter is applied and survive it unchanged.
    pub fn rank(
        &self,
        documents: &[RawDocument],
        job_description: &str,
        min_score: f64,
    ) -> Result<RankingReport> {
        if documents.is_empty() {
            return Err(ResumeRankerError::InvalidInput(
                "Please upload at least one resume file".to_string(),
            ));
        }
        if job_description.trim().is_empty() {
            return Err(ResumeRankerError::InvalidInput(
                "Please paste the job description (JD) to compare against".to_string(),
            ));
        }

        let keywords = self.keywords(job_description);
        info!(
            "Ranking {} resumes against {} distinct keywords",
            documents.len(),
            keywords.distinct_count()
        );

        let extracted: Vec<ExtractedDocument> = documents.iter().map(RawDocument::extract).collect();

        let scored: Vec<RankedResult> = extracted
            .iter()
            .map(|doc| {
                let breakdown = self.scorer.score(&doc.text, &keywords);
                debug!(
                    "{}: score {:.2}, matched {}, bonus {}",
                    doc.filename, breakdown.score, breakdown.matched, breakdown.freq_bonus
                );
                RankedResult {
                    rank: 0,
                    filename: doc.filename.clone(),
                    score: round2(breakdown.score),
                    matched_keywords: breakdown.matched,
                    freq_bonus: breakdown.freq_bonus,
                    char_count: doc.char_count,
                }
            })
            .collect();

        let results = rank_and_filter(scored, min_score);

        // Filenames are unique within a run
        let top_candidate = results.first().and_then(|top| {
            extracted
                .iter()
                .find(|doc| doc.filename == top.filename)
                .map(|doc| TopCandidate {
                    result: top.clone(),
                    preview: doc.preview(self.preview_chars),
                })
        });

        info!(
            "{} of {} resumes scored at least {}",
            results.len(),
            documents.len(),
            min_score
        );

        Ok(RankingReport {
            results,
            top_candidate,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                total_documents: documents.len(),
                keyword_count: keywords.distinct_count(),
                keyword_occurrences: keywords.total_count(),
                min_score,
                unreadable_documents: extracted
                    .iter()
                    .filter(|doc| doc.is_empty())
                    .map(|doc| doc.filename.clone())
                    .collect(),
            },
        })
    }
}

/// Sort by score descending, assign dense ranks, then drop rows below
/// `min_score`. Equal scores keep their input order.
pub fn rank_and_filter(mut results: Vec<RankedResult>, min_score: f64) -> Vec<RankedResult> {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));

    let scores: Vec<f64> = results.iter().map(|result| result.score).collect();
    for (result, rank) in results.iter_mut().zip(dense_rank(&scores)) {
        result.rank = rank;
    }

    results.retain(|result| result.score >= min_score);
    results
}

/// Dense ranks for scores already sorted in descending order: ties share a
/// rank and the next distinct score gets the next integer.
pub fn dense_rank(sorted_scores: &[f64]) -> Vec<usize> {
    let mut ranks = Vec::with_capacity(sorted_scores.len());
    let mut rank = 0;
    let mut previous: Option<f64> = None;

    for &score in sorted_scores {
        if previous != Some(score) {
            rank += 1;
            previous = Some(score);
        }
        ranks.push(rank);
    }

    ranks
}

/// Round to 2 decimal places. Exact halves of the binary value go to the
/// even digit, so `80.625` becomes `80.62`.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
