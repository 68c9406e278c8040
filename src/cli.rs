//! CLI interface for the resume ranker

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-ranker")]
#[command(about = "Rank resumes against a job description by keyword overlap")]
#[command(long_about = "Extract text from PDF, DOCX and plain-text resumes, score each one by how many \
job description keywords it covers and how often, and print a dense-ranked table")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Where the job description comes from
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct JobSource {
    /// Path to the job description file (TXT, MD, PDF, DOCX)
    #[arg(short, long)]
    pub job: Option<PathBuf>,

    /// Job description text given inline
    #[arg(long)]
    pub job_text: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank resumes against a job description
    Rank {
        #[command(flatten)]
        job: JobSource,

        /// Resume files (PDF, DOCX, DOC, anything else is read as text)
        #[arg(required = true)]
        resumes: Vec<PathBuf>,

        /// Only show resumes scoring at least this much (0-100)
        #[arg(short, long, value_parser = parse_min_score)]
        min_score: Option<f64>,

        /// Output format: console, json, csv, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file, or to resume_ranks.<ext> inside a directory
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show a text preview of the top candidate
        #[arg(short, long)]
        preview: bool,
    },

    /// Show the keywords extracted from a job description
    Keywords {
        #[command(flatten)]
        job: JobSource,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "ranking.min_score")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "csv" => Ok(crate::config::OutputFormat::Csv),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        "html" => Ok(crate::config::OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, csv, markdown, html",
            format
        )),
    }
}

fn parse_min_score(value: &str) -> Result<f64, String> {
    let min_score: f64 = value
        .parse()
        .map_err(|_| format!("Invalid minimum score: {}", value))?;
    crate::config::validate_min_score(min_score)?;
    Ok(min_score)
}
