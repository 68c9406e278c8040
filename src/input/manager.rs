//! Input manager for loading resume files from disk

use crate::error::{Result, ResumeRankerError};
use crate::processing::document::RawDocument;
use log::info;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    cache: HashMap<String, RawDocument>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Read a resume into memory. The document is named by its file name,
    /// which is what format detection and the ranked table use.
    pub async fn load_document(&mut self, path: &Path) -> Result<RawDocument> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&path_str) {
                info!("Using cached document for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.is_file() {
            return Err(ResumeRankerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                ResumeRankerError::InvalidInput(format!("Not a file path: {}", path.display()))
            })?;

        info!("Reading resume: {}", path.display());
        let bytes = fs::read(path).await?;
        let document = RawDocument::new(filename, bytes);

        if self.enable_cache {
            self.cache.insert(path_str, document.clone());
        }

        Ok(document)
    }

    /// Read the job description through the same extractors as resumes, so a
    /// PDF or DOCX posting works as well as a text file.
    pub async fn load_job_description(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(ResumeRankerError::InvalidInput(format!(
                "Job description file does not exist: {}",
                path.display()
            )));
        }

        info!("Reading job description: {}", path.display());
        let bytes = fs::read(path).await?;
        let filename = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();

        Ok(RawDocument::new(filename, bytes).extract().text)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
