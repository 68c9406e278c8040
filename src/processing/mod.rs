//! Keyword extraction, scoring and ranking

pub mod document;
pub mod tokenizer;
pub mod keywords;
pub mod scorer;
pub mod ranking;
