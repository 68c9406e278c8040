//! Resume ranker library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use error::{Result, ResumeRankerError};
pub use config::Config;
pub use input::extract;
pub use processing::document::RawDocument;
pub use processing::keywords::{KeywordExtractor, KeywordMultiset};
pub use processing::ranking::RankingEngine;
pub use processing::scorer::{ScoreBreakdown, Scorer};
pub use output::report::{RankedResult, RankingReport};
