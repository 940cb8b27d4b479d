//! Score reports and the extraction-failure outcome

use super::Tier;
use serde::{Deserialize, Serialize};

/// Result of grading one document
///
/// `reasons` are in rule evaluation order, not importance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub tier: Tier,
    pub score: u32,
    pub reasons: Vec<String>,
}

impl ScoreReport {
    /// Degraded report for a document whose text could not be extracted
    ///
    /// Tier Easy, score 0, a single reason naming the failure.
    pub fn extraction_failed(reason: impl Into<String>) -> Self {
        Self {
            tier: Tier::Easy,
            score: 0,
            reasons: vec![reason.into()],
        }
    }
}

/// What to do with documents whose text could not be extracted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Report them as Easy with score 0 (under-classify rather than abort)
    #[default]
    TreatAsEasy,
    /// Leave them out of the batch entirely
    Skip,
}

/// Per-document outcome at the extraction boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreOutcome {
    Scored(ScoreReport),
    ExtractionFailed { reason: String },
}

impl ScoreOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ScoreOutcome::ExtractionFailed { .. })
    }

    /// Apply a failure policy, yielding the report to record (if any)
    pub fn resolve(self, policy: FailurePolicy) -> Option<ScoreReport> {
        match (self, policy) {
            (ScoreOutcome::Scored(report), _) => Some(report),
            (ScoreOutcome::ExtractionFailed { reason }, FailurePolicy::TreatAsEasy) => {
                Some(ScoreReport::extraction_failed(reason))
            }
            (ScoreOutcome::ExtractionFailed { .. }, FailurePolicy::Skip) => None,
        }
    }
}
