//! Batch grading
//!
//! Grades many documents concurrently. Each document is one blocking task
//! (extract text, then score) on the tokio blocking pool; a semaphore caps
//! how many run at once. Documents share nothing, so completion order does
//! not matter: results are sorted by path before being returned.
//!
//! Extraction failures never abort the batch. They become
//! [`ScoreOutcome::ExtractionFailed`] and the [`FailurePolicy`] decides
//! whether they are reported as Easy or dropped.

use crate::extractors::TextExtractor;
use crate::models::{
    BatchReport, DocumentResult, FailurePolicy, FeatureSet, ScoreOutcome, SheetLocation,
    TierHistogram,
};
use crate::scoring::DifficultyScorer;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Extract and score one document
///
/// Never fails: extraction errors come back as `ExtractionFailed` with a
/// reason naming the failure.
pub fn score_document(
    extractor: &dyn TextExtractor,
    scorer: &DifficultyScorer,
    path: &Path,
) -> ScoreOutcome {
    match extractor.extract(path).and_then(FeatureSet::from_extracted) {
        Ok(features) => ScoreOutcome::Scored(scorer.score(&features)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Text extraction failed");
            ScoreOutcome::ExtractionFailed {
                reason: format!("failed to read document: {}", e),
            }
        }
    }
}

/// Concurrent grader for a list of library documents
pub struct BatchScorer {
    extractor: Arc<dyn TextExtractor>,
    scorer: Arc<DifficultyScorer>,
    policy: FailurePolicy,
    max_concurrency: usize,
}

impl BatchScorer {
    pub fn new(extractor: Arc<dyn TextExtractor>, scorer: Arc<DifficultyScorer>) -> Self {
        Self {
            extractor,
            scorer,
            policy: FailurePolicy::default(),
            max_concurrency: 1,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Grade every location
    ///
    /// Cancelling `cancel` stops new documents from starting; documents
    /// already running finish and are included, and the report is marked
    /// `cancelled`.
    pub async fn run(
        &self,
        library_root: &Path,
        locations: Vec<SheetLocation>,
        cancel: CancellationToken,
    ) -> BatchReport {
        let scan_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();
        let total = locations.len();

        info!(%scan_id, documents = total, concurrency = self.max_concurrency, "Grading started");

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();
        let mut cancelled = false;

        for location in locations {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let extractor = Arc::clone(&self.extractor);
            let scorer = Arc::clone(&self.scorer);
            tasks.spawn_blocking(move || {
                let _permit = permit;
                let outcome = score_document(extractor.as_ref(), &scorer, &location.path);
                (location, outcome)
            });
        }

        if cancelled {
            warn!(%scan_id, "Grading cancelled, waiting for running documents");
        }

        let mut documents = Vec::with_capacity(total);
        let mut skipped = 0;
        let mut extraction_failures = 0;

        while let Some(joined) = tasks.join_next().await {
            let (location, outcome) = match joined {
                Ok(done) => done,
                Err(e) => {
                    error!(%scan_id, error = %e, "Grading task failed");
                    skipped += 1;
                    continue;
                }
            };

            let extraction_failed = outcome.is_failure();
            if extraction_failed {
                extraction_failures += 1;
            }

            match outcome.resolve(self.policy) {
                Some(report) => {
                    info!(
                        song = %location.song,
                        category = %location.category,
                        tier = %report.tier,
                        score = report.score,
                        "Graded document"
                    );
                    documents.push(DocumentResult::new(location, report, extraction_failed));
                }
                None => {
                    info!(path = %location.path.display(), "Skipped unreadable document");
                    skipped += 1;
                }
            }
        }

        documents.sort_by(|a, b| a.location.path.cmp(&b.location.path));
        let histogram: TierHistogram = documents.iter().map(|d| &d.report).collect();
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            %scan_id,
            graded = documents.len(),
            skipped,
            extraction_failures,
            easy = histogram.easy,
            medium = histogram.medium,
            hard = histogram.hard,
            duration_ms,
            "Grading finished"
        );

        BatchReport {
            scan_id,
            started_at,
            duration_ms,
            library_root: PathBuf::from(library_root),
            documents,
            histogram,
            skipped,
            extraction_failures,
            cancelled,
        }
    }
}
