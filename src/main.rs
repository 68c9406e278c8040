//! resume-ranker: rank resumes against a job description by keyword overlap

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_ranker::cli::{parse_output_format, Cli, Commands, ConfigAction, JobSource};
use resume_ranker::config::{Config, OutputFormat};
use resume_ranker::input::manager::InputManager;
use resume_ranker::output::formatter::{resolve_save_path, save_report_to_file, ReportGenerator};
use resume_ranker::processing::ranking::RankingEngine;
use resume_ranker::{RawDocument, Result, ResumeRankerError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    // Load configuration
    let config = match Config::load(Some(config_path.as_path())) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Rank {
            job,
            resumes,
            min_score,
            output,
            save,
            preview,
        } => {
            let format = resolve_format(output.as_deref(), save.as_deref(), config.output.format)?;
            let save = save.map(|path| resolve_save_path(&path, &format));
            let min_score = min_score.unwrap_or(config.ranking.min_score);

            let mut input_manager = InputManager::new().with_cache(config.input.enable_cache);
            let job_description = read_job_description(&input_manager, &job).await?;
            let documents = load_resumes(&mut input_manager, &resumes).await?;

            let engine = RankingEngine::new().with_preview_chars(config.ranking.preview_chars);
            let report = engine.rank(&documents, &job_description, min_score)?;

            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                preview,
                config.output.pretty_json,
                config.output.include_html_styles,
            );
            let content = generator.generate_report(&report, &format)?;

            match save {
                Some(path) => {
                    save_report_to_file(&content, &path)?;
                    println!("{}", report.summary_line());
                    println!("Saved {:?} results to {}", format, path.display());
                }
                None => print!("{}", content),
            }
        }

        Commands::Keywords { job } => {
            let input_manager = InputManager::new();
            let job_description = read_job_description(&input_manager, &job).await?;
            let keywords = RankingEngine::new().keywords(&job_description);

            if keywords.is_empty() {
                println!("No keywords found in the job description.");
                return Ok(());
            }

            println!(
                "{} distinct keywords, {} occurrences\n",
                keywords.distinct_count(),
                keywords.total_count()
            );
            for (keyword, count) in keywords.by_frequency() {
                println!("{:>4}  {}", count, keyword);
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    ResumeRankerError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("# {}\n", config_path.display());
                print!("{}", content);
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }

            Some(ConfigAction::Reset) => {
                Config::default().save(config_path)?;
                println!("Configuration reset to defaults: {}", config_path.display());
            }

            Some(ConfigAction::Set { key, value }) => {
                let mut config = config;
                config.set(&key, &value)?;
                config.save(config_path)?;
                println!("Set {} = {}", key, value);
            }
        },
    }

    Ok(())
}

/// Explicit `--output` wins, then the `--save` file extension, then the configured default.
fn resolve_format(
    output: Option<&str>,
    save: Option<&Path>,
    default: OutputFormat,
) -> Result<OutputFormat> {
    if let Some(output) = output {
        return parse_output_format(output).map_err(ResumeRankerError::InvalidInput);
    }

    let inferred = save
        .filter(|path| !path.is_dir())
        .and_then(|path| path.extension())
        .and_then(|ext| ext.to_str())
        .and_then(OutputFormat::from_extension);

    Ok(inferred.unwrap_or(default))
}

async fn read_job_description(input_manager: &InputManager, job: &JobSource) -> Result<String> {
    match (&job.job_text, &job.job) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => input_manager.load_job_description(path).await,
        (None, None) => Err(ResumeRankerError::InvalidInput(
            "Please paste the job description (JD) to compare against".to_string(),
        )),
    }
}

async fn load_resumes(
    input_manager: &mut InputManager,
    paths: &[PathBuf],
) -> Result<Vec<RawDocument>> {
    let progress = ProgressBar::new(paths.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut documents = Vec::with_capacity(paths.len());
    let mut seen = HashSet::new();
    for path in paths {
        progress.set_message(path.display().to_string());
        let document = input_manager.load_document(path).await?;
        if !seen.insert(document.filename.clone()) {
            warn!(
                "Duplicate filename '{}': results for it will be ambiguous",
                document.filename
            );
        }
        documents.push(document);
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!("Loaded {} resumes", documents.len());
    Ok(documents)
}
