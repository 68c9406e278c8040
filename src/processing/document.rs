//! Document structures

use crate::input::file_detector::FileType;
use crate::input::text_extractor;
use serde::{Deserialize, Serialize};

/// An uploaded resume: its filename and the raw file bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Text recovered from a [`RawDocument`]. Empty text means nothing could be
/// recovered, which is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub filename: String,
    pub text: String,
    pub char_count: usize,
}

impl RawDocument {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub fn file_type(&self) -> FileType {
        FileType::from_filename(&self.filename)
    }

    pub fn extract(&self) -> ExtractedDocument {
        let text = text_extractor::extract(&self.filename, &self.bytes);
        ExtractedDocument {
            filename: self.filename.clone(),
            char_count: text.chars().count(),
            text,
        }
    }
}

impl ExtractedDocument {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The first `max_chars` characters of the text.
    pub fn preview(&self, max_chars: usize) -> String {
        self.text.chars().take(max_chars).collect()
    }
}
