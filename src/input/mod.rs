//! Input processing module
//! Handles file type detection, text extraction, and loading resumes from disk

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use text_extractor::extract;
