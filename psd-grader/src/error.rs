//! Error types for psd-grader
//!
//! Covers failures that stop an operation. Per-document problems never
//! surface here: extraction failures become degraded reports (see
//! [`crate::models::ScoreOutcome`]) and failed moves are listed in the
//! relocation report.

use crate::services::file_scanner::ScanError;
use thiserror::Error;

/// Grader error type
#[derive(Debug, Error)]
pub enum GraderError {
    /// Library scan failed
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// `[scoring]` section could not be parsed
    #[error("Invalid scoring table: {0}")]
    ScoringTable(String),

    /// psd-common error
    #[error("Common error: {0}")]
    Common(#[from] psd_common::Error),
}

/// Result type for grader operations
pub type GraderResult<T> = Result<T, GraderError>;
