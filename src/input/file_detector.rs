//! File type detection

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    WordProcessing,
    Text,
}

impl FileType {
    /// Infer the format from a filename suffix, case-insensitively.
    /// Anything that is not a PDF or Word document is read as plain text.
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            FileType::Pdf
        } else if lower.ends_with(".docx") || lower.ends_with(".doc") {
            FileType::WordProcessing
        } else {
            FileType::Text
        }
    }
}
