//! Batch grading results

use super::{ScoreReport, SheetLocation, Tier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Grading result for one document in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub location: SheetLocation,
    /// Tier of the directory the document sits in (None if unrecognized)
    pub current_tier: Option<Tier>,
    pub report: ScoreReport,
    /// True when the report is the degraded extraction-failure report
    pub extraction_failed: bool,
}

impl DocumentResult {
    pub fn new(location: SheetLocation, report: ScoreReport, extraction_failed: bool) -> Self {
        let current_tier = location.current_tier();
        Self {
            location,
            current_tier,
            report,
            extraction_failed,
        }
    }

    pub fn suggested_tier(&self) -> Tier {
        self.report.tier
    }

    /// Document sits in a known tier folder that differs from its grade
    pub fn needs_change(&self) -> bool {
        self.current_tier
            .is_some_and(|current| current != self.suggested_tier())
    }
}

/// Count of documents per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierHistogram {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl TierHistogram {
    pub fn record(&mut self, tier: Tier) {
        match tier {
            Tier::Easy => self.easy += 1,
            Tier::Medium => self.medium += 1,
            Tier::Hard => self.hard += 1,
        }
    }

    pub fn count(&self, tier: Tier) -> usize {
        match tier {
            Tier::Easy => self.easy,
            Tier::Medium => self.medium,
            Tier::Hard => self.hard,
        }
    }

    pub fn total(&self) -> usize {
        self.easy + self.medium + self.hard
    }
}

impl<'a> FromIterator<&'a ScoreReport> for TierHistogram {
    fn from_iter<I: IntoIterator<Item = &'a ScoreReport>>(iter: I) -> Self {
        let mut histogram = TierHistogram::default();
        for report in iter {
            histogram.record(report.tier);
        }
        histogram
    }
}

/// Summary of one library scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub scan_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub library_root: PathBuf,
    /// Graded documents, ordered by path
    pub documents: Vec<DocumentResult>,
    pub histogram: TierHistogram,
    /// Documents dropped by the failure policy or lost to a failed task
    pub skipped: usize,
    /// Documents whose text could not be extracted (graded or skipped)
    pub extraction_failures: usize,
    /// Scan stopped early on request
    pub cancelled: bool,
}

impl BatchReport {
    pub fn needs_change(&self) -> Vec<&DocumentResult> {
        self.documents.iter().filter(|d| d.needs_change()).collect()
    }
}
