//! Configuration management for the resume ranker

use crate::error::{Result, ResumeRankerError};
use crate::processing::ranking::DEFAULT_PREVIEW_CHARS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub ranking: RankingConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Default minimum score shown, 0 to 100.
    pub min_score: f64,
    pub preview_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub enable_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub pretty_json: bool,
    pub include_html_styles: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Csv,
    Markdown,
    Html,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Console => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" => Some(OutputFormat::Console),
            "json" => Some(OutputFormat::Json),
            "csv" => Some(OutputFormat::Csv),
            "md" | "markdown" => Some(OutputFormat::Markdown),
            "html" | "htm" => Some(OutputFormat::Html),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ranking: RankingConfig {
                min_score: 0.0,
                preview_chars: DEFAULT_PREVIEW_CHARS,
            },
            input: InputConfig { enable_cache: true },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
                pretty_json: true,
                include_html_styles: true,
            },
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`. A missing
    /// file is created with the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                ResumeRankerError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save(&config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeRankerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ranker")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        validate_min_score(self.ranking.min_score).map_err(ResumeRankerError::Configuration)
    }

    /// Set a single value by dotted key, e.g. `ranking.min_score`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |expected: &str| {
            ResumeRankerError::Configuration(format!(
                "Invalid value '{}' for {}: expected {}",
                value, key, expected
            ))
        };

        match key {
            "ranking.min_score" => {
                let min_score: f64 = value.parse().map_err(|_| invalid("a number"))?;
                validate_min_score(min_score).map_err(ResumeRankerError::Configuration)?;
                self.ranking.min_score = min_score;
            }
            "ranking.preview_chars" => {
                self.ranking.preview_chars =
                    value.parse().map_err(|_| invalid("a non-negative integer"))?;
            }
            "input.enable_cache" => {
                self.input.enable_cache = parse_bool(value).ok_or_else(|| invalid("true or false"))?;
            }
            "output.format" => {
                self.output.format = crate::cli::parse_output_format(value)
                    .map_err(ResumeRankerError::Configuration)?;
            }
            "output.color_output" => {
                self.output.color_output = parse_bool(value).ok_or_else(|| invalid("true or false"))?;
            }
            "output.pretty_json" => {
                self.output.pretty_json = parse_bool(value).ok_or_else(|| invalid("true or false"))?;
            }
            "output.include_html_styles" => {
                self.output.include_html_styles =
                    parse_bool(value).ok_or_else(|| invalid("true or false"))?;
            }
            _ => {
                return Err(ResumeRankerError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }

        Ok(())
    }
}

pub fn validate_min_score(min_score: f64) -> std::result::Result<(), String> {
    if (0.0..=100.0).contains(&min_score) {
        Ok(())
    } else {
        Err(format!("Minimum score must be between 0 and 100, got {}", min_score))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set("ranking.min_score", "42.5").unwrap();
        config.set("output.format", "csv").unwrap();
        config.set("output.color_output", "false").unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded.ranking.min_score, 42.5);
        assert_eq!(loaded.output.format, OutputFormat::Csv);
        assert!(!loaded.output.color_output);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("ranking.min_score", "150").is_err());
        assert!(config.set("ranking.min_score", "high").is_err());
        assert!(config.set("input.enable_cache", "maybe").is_err());
        assert!(config.set("output.format", "pdf").is_err());
        assert!(config.set("scoring.coverage_weight", "0.5").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_out_of_range_min_score_in_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.ranking.min_score = -5.0;
        config.save(&path).unwrap();

        assert!(matches!(
            Config::load(Some(path.as_path())),
            Err(ResumeRankerError::Configuration(_))
        ));
    }

    #[test]
    fn test_output_format_extensions() {
        assert_eq!(OutputFormat::from_extension("CSV"), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_extension("htm"), Some(OutputFormat::Html));
        assert_eq!(OutputFormat::from_extension("pdf"), None);
        assert_eq!(OutputFormat::Markdown.extension(), "md");
    }
}
