//! Batch grading over a fixture library

mod helpers;

use helpers::library::{Library, StubExtractor, EASY_SHEET, HARD_SHEET, MEDIUM_SHEET};
use helpers::log_capture::capture_logs;
use psd_common::config::LibraryConfig;
use psd_grader::extractors::PdfTextExtractor;
use psd_grader::models::{FailurePolicy, Tier};
use psd_grader::scoring::DifficultyScorer;
use psd_grader::services::{BatchScorer, LibraryScanner};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn fixture() -> Library {
    let library = Library::new();
    library.add_sheet("printed", "Minuet", "Easy", "minuet.pdf", EASY_SHEET);
    library.add_sheet("printed", "Sonatina", "Easy", "sonatina.pdf", MEDIUM_SHEET);
    library.add_sheet("not print", "Etude", "Easy", "etude.pdf", HARD_SHEET);
    library.add_corrupt("printed", "Broken", "Easy", "broken.pdf");
    library
}

fn batch(policy: FailurePolicy) -> BatchScorer {
    BatchScorer::new(Arc::new(StubExtractor), Arc::new(DifficultyScorer::new()))
        .with_policy(policy)
        .with_max_concurrency(2)
}

#[tokio::test]
async fn test_grades_every_document() {
    let library = fixture();
    let locations = LibraryScanner::new(library.root(), LibraryConfig::default())
        .discover()
        .unwrap();
    assert_eq!(locations.len(), 4);

    let report = batch(FailurePolicy::TreatAsEasy)
        .run(library.root(), locations, CancellationToken::new())
        .await;

    assert!(!report.cancelled);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.extraction_failures, 1);
    assert_eq!(report.histogram.easy, 2);
    assert_eq!(report.histogram.medium, 1);
    assert_eq!(report.histogram.hard, 1);
    assert_eq!(report.histogram.total(), report.documents.len());

    let paths: Vec<_> = report.documents.iter().map(|d| d.location.path.clone()).collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);

    let etude = report
        .documents
        .iter()
        .find(|d| d.location.song == "Etude")
        .unwrap();
    assert_eq!(etude.report.tier, Tier::Hard);
    assert_eq!(etude.report.score, 7);
    assert_eq!(etude.report.reasons[0], "3 pages (complex)");

    let broken = report
        .documents
        .iter()
        .find(|d| d.location.song == "Broken")
        .unwrap();
    assert!(broken.extraction_failed);
    assert_eq!(broken.report.tier, Tier::Easy);
    assert_eq!(broken.report.score, 0);
    assert_eq!(broken.report.reasons.len(), 1);
    assert!(broken.report.reasons[0].starts_with("failed to read document:"));
}

#[tokio::test]
async fn test_skip_policy_drops_unreadable() {
    let library = fixture();
    let locations = LibraryScanner::new(library.root(), LibraryConfig::default())
        .discover()
        .unwrap();

    let report = batch(FailurePolicy::Skip)
        .run(library.root(), locations, CancellationToken::new())
        .await;

    assert_eq!(report.documents.len(), 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.extraction_failures, 1);
    assert!(report.documents.iter().all(|d| d.location.song != "Broken"));
}

#[tokio::test]
async fn test_needs_change_lists_misfiled_documents() {
    let library = fixture();
    let locations = LibraryScanner::new(library.root(), LibraryConfig::default())
        .discover()
        .unwrap();

    let report = batch(FailurePolicy::TreatAsEasy)
        .run(library.root(), locations, CancellationToken::new())
        .await;

    let mut songs: Vec<&str> = report
        .needs_change()
        .iter()
        .map(|d| d.location.song.as_str())
        .collect();
    songs.sort();
    assert_eq!(songs, vec!["Etude", "Sonatina"]);
}

#[tokio::test]
async fn test_cancelled_before_start_grades_nothing() {
    let library = fixture();
    let locations = LibraryScanner::new(library.root(), LibraryConfig::default())
        .discover()
        .unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = batch(FailurePolicy::TreatAsEasy)
        .run(library.root(), locations, cancel)
        .await;

    assert!(report.cancelled);
    assert!(report.documents.is_empty());
    assert_eq!(report.histogram.total(), 0);
}

#[tokio::test]
async fn test_empty_library_report() {
    let library = Library::new();
    let report = batch(FailurePolicy::TreatAsEasy)
        .run(library.root(), Vec::new(), CancellationToken::new())
        .await;

    assert!(report.documents.is_empty());
    assert!(!report.cancelled);
    assert_eq!(report.library_root, library.root());
}

#[tokio::test]
async fn test_report_serializes_to_json() {
    let library = fixture();
    let locations = LibraryScanner::new(library.root(), LibraryConfig::default())
        .discover()
        .unwrap();

    let report = batch(FailurePolicy::TreatAsEasy)
        .run(library.root(), locations, CancellationToken::new())
        .await;

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["histogram"]["hard"], 1);
    assert_eq!(json["documents"].as_array().unwrap().len(), 4);
    assert_eq!(json["documents"][0]["location"]["song"], "Etude");
    assert_eq!(json["documents"][0]["report"]["tier"], "Hard");
}

#[tokio::test]
async fn test_logs_summary() {
    let (logs, _guard) = capture_logs();
    let library = fixture();
    let locations = LibraryScanner::new(library.root(), LibraryConfig::default())
        .discover()
        .unwrap();

    batch(FailurePolicy::TreatAsEasy)
        .run(library.root(), locations, CancellationToken::new())
        .await;

    logs.assert_contains("Library scan complete");
    logs.assert_contains("Grading finished");
    assert_eq!(logs.count_at(tracing::Level::INFO, "Graded document"), 4);
}

#[tokio::test]
async fn test_unreadable_pdfs_are_graded_easy() {
    let library = Library::new();
    library.write("printed/Broken/Easy/Piano/truncated.pdf", b"");
    library.write("printed/Broken/Easy/Piano/garbled.pdf", b"\x00\x01garbage");

    let locations = LibraryScanner::new(library.root(), LibraryConfig::default())
        .discover()
        .unwrap();
    assert_eq!(locations.len(), 2);

    let report = BatchScorer::new(Arc::new(PdfTextExtractor::new()), Arc::new(DifficultyScorer::new()))
        .with_policy(FailurePolicy::TreatAsEasy)
        .run(library.root(), locations, CancellationToken::new())
        .await;

    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.extraction_failures, 2);
    assert_eq!(report.histogram.easy, 2);
    for document in &report.documents {
        assert!(document.extraction_failed);
        assert_eq!(document.report.score, 0);
        assert!(document.report.reasons[0].starts_with("failed to read document: "));
    }
}
