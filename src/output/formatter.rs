//! Output formatters for the ranked table

use crate::config::OutputFormat;
use crate::error::{Result, ResumeRankerError};
use crate::output::report::*;
use askama::Template;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// CSV header, in column order.
pub const CSV_HEADER: [&str; 6] = [
    "rank",
    "filename",
    "score",
    "matched_keywords",
    "freq_bonus",
    "char_count",
];

/// Trait for formatting ranking reports
pub trait OutputFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String>;
}

/// Colored table for the terminal
pub struct ConsoleFormatter {
    use_colors: bool,
    show_preview: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

/// RFC 4180 CSV, one row per retained resume
pub struct CsvFormatter;

pub struct MarkdownFormatter;

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    csv_formatter: CsvFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Ranking</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            color: #333;
            max-width: 1000px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        h1 { color: #007acc; border-bottom: 3px solid #007acc; padding-bottom: 10px; }
        table { border-collapse: collapse; width: 100%; margin: 20px 0; }
        th, td { padding: 8px 12px; border-bottom: 1px solid #e9ecef; text-align: left; }
        th { background: #f1f3f5; }
        td.num { text-align: right; font-variant-numeric: tabular-nums; }
        .score-high { color: #28a745; font-weight: bold; }
        .score-mid { color: #b8860b; font-weight: bold; }
        .score-low { color: #dc3545; }
        .top { background: #eef7ff; padding: 15px; border-left: 4px solid #007acc; border-radius: 4px; }
        pre { white-space: pre-wrap; background: #f8f9fa; padding: 10px; max-height: 400px; overflow: auto; }
        .metadata { font-size: 0.9em; color: #6c757d; margin-top: 30px; }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <h1>Resume Ranking</h1>
        <p>{{ summary }}</p>
        <table>
            <thead>
                <tr><th>Rank</th><th>Filename</th><th>Score</th><th>Matched keywords</th><th>Freq bonus</th><th>Chars</th></tr>
            </thead>
            <tbody>
            {% for row in rows %}
                <tr>
                    <td class="num">{{ row.rank }}</td>
                    <td>{{ row.filename }}</td>
                    <td class="num {{ row.score_class }}">{{ row.score }}</td>
                    <td class="num">{{ row.matched_keywords }}</td>
                    <td class="num">{{ row.freq_bonus }}</td>
                    <td class="num">{{ row.char_count }}</td>
                </tr>
            {% endfor %}
            </tbody>
        </table>
        {% if has_top %}
        <div class="top">
            <h2>Top candidate</h2>
            <p><strong>{{ top_filename }}</strong> | Score: {{ top_score }}% | Rank {{ top_rank }}</p>
            {% if has_preview %}
            <pre>{{ top_preview }}</pre>
            {% endif %}
        </div>
        {% endif %}
        <div class="metadata">
            <p>Generated by resume-ranker v{{ version }} at {{ generated_at }}</p>
            <p>{{ keyword_count }} distinct keywords, {{ keyword_occurrences }} occurrences, {{ total_documents }} resumes analyzed</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    summary: String,
    rows: Vec<HtmlRow>,
    has_top: bool,
    top_filename: String,
    top_score: String,
    top_rank: usize,
    has_preview: bool,
    top_preview: String,
    version: String,
    generated_at: String,
    keyword_count: usize,
    keyword_occurrences: usize,
    total_documents: usize,
}

struct HtmlRow {
    rank: usize,
    filename: String,
    score: String,
    score_class: &'static str,
    matched_keywords: usize,
    freq_bonus: usize,
    char_count: usize,
}

/// Score band used for coloring: 0 low, 1 mid, 2 high.
fn score_band(score: f64) -> u8 {
    if score >= 75.0 {
        2
    } else if score >= 50.0 {
        1
    } else {
        0
    }
}

fn format_generated_at(report: &RankingReport) -> String {
    report
        .metadata
        .generated_at
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, show_preview: bool) -> Self {
        Self {
            use_colors,
            show_preview,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score(&self, score: f64) -> String {
        // Pad before coloring so escape codes don't break alignment
        let text = format!("{:>7.2}", score);
        let color = match score_band(score) {
            2 => Color::Green,
            1 => Color::Yellow,
            _ => Color::Red,
        };
        self.colorize(&text, color)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();
        let metadata = &report.metadata;

        output.push_str(&self.format_header("RESUME RANKING", 1));
        output.push_str(&format!(
            "Generated: {} | Keywords: {} distinct, {} total | Resumes analyzed: {}\n",
            format_generated_at(report),
            metadata.keyword_count,
            metadata.keyword_occurrences,
            metadata.total_documents
        ));

        if !metadata.unreadable_documents.is_empty() {
            output.push_str(&self.colorize(
                &format!(
                    "No text could be extracted from: {}\n",
                    metadata.unreadable_documents.join(", ")
                ),
                Color::Yellow,
            ));
        }

        output.push('\n');
        output.push_str(&self.colorize(&report.summary_line(), Color::Cyan));
        output.push('\n');

        if !report.results.is_empty() {
            output.push_str(&format!(
                "\n{:>4}  {:>7}  {:>7}  {:>5}  {:>7}  {}\n",
                "Rank", "Score", "Matched", "Bonus", "Chars", "Filename"
            ));
            for row in &report.results {
                output.push_str(&format!(
                    "{:>4}  {}  {:>7}  {:>5}  {:>7}  {}\n",
                    row.rank,
                    self.format_score(row.score),
                    row.matched_keywords,
                    row.freq_bonus,
                    row.char_count,
                    row.filename
                ));
            }
        }

        if let Some(top) = &report.top_candidate {
            output.push_str(&self.format_header("Top candidate", 2));
            output.push_str(&format!(
                "{} | Score: {}% | Rank {}\n",
                self.colorize(&top.result.filename, Color::Cyan),
                top.result.score,
                top.result.rank
            ));

            if self.show_preview {
                output.push_str(&self.format_header("Preview", 3));
                if top.preview.is_empty() {
                    output.push_str("(no text extracted)\n");
                } else {
                    output.push_str(&top.preview);
                    output.push('\n');
                }
            }
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        if report.results.is_empty() {
            writer.write_record(CSV_HEADER)?;
        }
        for row in &report.results {
            writer.serialize(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ResumeRankerError::OutputFormatting(format!("Failed to flush CSV: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ResumeRankerError::OutputFormatting(format!("CSV is not UTF-8: {}", e)))
    }
}

impl MarkdownFormatter {
    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Resume Ranking\n\n");
        output.push_str(&format!("*Generated: {}*\n\n", format_generated_at(report)));
        output.push_str(&format!("{}\n\n", report.summary_line()));

        output.push_str("| Rank | Filename | Score | Matched keywords | Freq bonus | Chars |\n");
        output.push_str("|---:|---|---:|---:|---:|---:|\n");
        for row in &report.results {
            output.push_str(&format!(
                "| {} | {} | {:.2} | {} | {} | {} |\n",
                row.rank,
                Self::escape_cell(&row.filename),
                row.score,
                row.matched_keywords,
                row.freq_bonus,
                row.char_count
            ));
        }

        if let Some(top) = &report.top_candidate {
            output.push_str("\n## Top candidate\n\n");
            output.push_str(&format!(
                "**{}** | Score: {}% | Rank {}\n",
                top.result.filename, top.result.score, top.result.rank
            ));
        }

        if !report.metadata.unreadable_documents.is_empty() {
            output.push_str("\n## Unreadable documents\n\n");
            for name in &report.metadata.unreadable_documents {
                output.push_str(&format!("- {}\n", name));
            }
        }

        Ok(output)
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &RankingReport) -> HtmlTemplate {
        let rows = report
            .results
            .iter()
            .map(|row| HtmlRow {
                rank: row.rank,
                filename: row.filename.clone(),
                score: format!("{:.2}", row.score),
                score_class: match score_band(row.score) {
                    2 => "score-high",
                    1 => "score-mid",
                    _ => "score-low",
                },
                matched_keywords: row.matched_keywords,
                freq_bonus: row.freq_bonus,
                char_count: row.char_count,
            })
            .collect();

        let top = report.top_candidate.as_ref();

        HtmlTemplate {
            include_styles: self.include_styles,
            summary: report.summary_line(),
            rows,
            has_top: top.is_some(),
            top_filename: top.map(|t| t.result.filename.clone()).unwrap_or_default(),
            top_score: top.map(|t| t.result.score.to_string()).unwrap_or_default(),
            top_rank: top.map(|t| t.result.rank).unwrap_or_default(),
            has_preview: top.map(|t| !t.preview.is_empty()).unwrap_or(false),
            top_preview: top.map(|t| t.preview.clone()).unwrap_or_default(),
            version: report.metadata.version.clone(),
            generated_at: format_generated_at(report),
            keyword_count: report.metadata.keyword_count,
            keyword_occurrences: report.metadata.keyword_occurrences,
            total_documents: report.metadata.total_documents,
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| ResumeRankerError::OutputFormatting(format!("Failed to render HTML: {}", e)))
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        show_preview: bool,
        pretty_json: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, show_preview),
            json_formatter: JsonFormatter::new(pretty_json),
            csv_formatter: CsvFormatter,
            markdown_formatter: MarkdownFormatter,
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    pub fn generate_report(&self, report: &RankingReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Csv => self.csv_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// Default report file name, `resume_ranks.<ext>`.
pub fn suggest_filename(format: &OutputFormat) -> String {
    format!("resume_ranks.{}", format.extension())
}

/// A directory passed to `--save` gets the default report file name inside it.
pub fn resolve_save_path(path: &Path, format: &OutputFormat) -> PathBuf {
    if path.is_dir() {
        path.join(suggest_filename(format))
    } else {
        path.to_path_buf()
    }
}
