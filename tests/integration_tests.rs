//! Integration tests for the resume ranker

use resume_ranker::config::OutputFormat;
use resume_ranker::input::manager::InputManager;
use resume_ranker::output::formatter::ReportGenerator;
use resume_ranker::{RankingEngine, ResumeRankerError};
use std::fs;
use tempfile::TempDir;

const JOB: &str = "Must have Python and SQL experience. Python required.";

fn write_fixtures(dir: &TempDir) {
    fs::write(
        dir.path().join("alice.txt"),
        "Alice Example\nPython developer with SQL experience. Python, Python, Python.",
    )
    .unwrap();
    fs::write(dir.path().join("bob.md"), "# Bob\n\nJava developer, some SQL.").unwrap();
    fs::write(dir.path().join("carol.pdf"), "this is not really a pdf").unwrap();
    fs::write(dir.path().join("job.txt"), JOB).unwrap();
}

#[tokio::test]
async fn test_load_document_from_disk() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let mut manager = InputManager::new();

    let document = manager.load_document(&dir.path().join("alice.txt")).await.unwrap();
    assert_eq!(document.filename, "alice.txt");
    assert!(document.extract().text.contains("Python developer"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let path = dir.path().join("alice.txt");
    let mut manager = InputManager::new();

    let first = manager.load_document(&path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let second = manager.load_document(&path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);

    let mut uncached = InputManager::new().with_cache(false);
    uncached.load_document(&path).await.unwrap();
    assert_eq!(uncached.cache_size(), 0);
}

#[tokio::test]
async fn test_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    let mut manager = InputManager::new();

    let result = manager.load_document(&dir.path().join("missing.txt")).await;
    assert!(matches!(result, Err(ResumeRankerError::InvalidInput(_))));
}

#[tokio::test]
async fn test_job_description_from_file() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let manager = InputManager::new();

    let job = manager.load_job_description(&dir.path().join("job.txt")).await.unwrap();
    assert_eq!(job, JOB);
}

#[tokio::test]
async fn test_rank_files_end_to_end() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let mut manager = InputManager::new();

    let mut documents = Vec::new();
    for name in ["carol.pdf", "bob.md", "alice.txt"] {
        documents.push(manager.load_document(&dir.path().join(name)).await.unwrap());
    }

    let report = RankingEngine::new().rank(&documents, JOB, 0.0).unwrap();
    let names: Vec<&str> = report.results.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(names, vec!["alice.txt", "bob.md", "carol.pdf"]);

    // alice: python, sql, experience of {have, python x2, sql, experience, required}
    let alice = &report.results[0];
    assert_eq!(alice.rank, 1);
    assert_eq!(alice.matched_keywords, 3);
    assert_eq!(alice.freq_bonus, 4);
    assert_eq!(alice.score, 54.67);

    let carol = &report.results[2];
    assert_eq!(carol.score, 0.0);
    assert_eq!(carol.char_count, 0);
    assert_eq!(carol.rank, 3);
    assert_eq!(report.metadata.unreadable_documents, vec!["carol.pdf".to_string()]);

    let csv = ReportGenerator::new()
        .generate_report(&report, &OutputFormat::Csv)
        .unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("rank,filename,score,matched_keywords,freq_bonus,char_count")
    );
    assert!(lines.next().unwrap().starts_with("1,alice.txt,54.67,3,4,"));
}

#[tokio::test]
async fn test_threshold_filters_after_ranking() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let mut manager = InputManager::new();

    let mut documents = Vec::new();
    for name in ["alice.txt", "bob.md", "carol.pdf"] {
        documents.push(manager.load_document(&dir.path().join(name)).await.unwrap());
    }

    let report = RankingEngine::new().rank(&documents, JOB, 10.0).unwrap();
    let rows: Vec<(&str, usize)> = report
        .results
        .iter()
        .map(|r| (r.filename.as_str(), r.rank))
        .collect();
    assert_eq!(rows, vec![("alice.txt", 1), ("bob.md", 2)]);
    assert_eq!(report.top_candidate.unwrap().result.filename, "alice.txt");
}
