//! Data models for psd-grader
//!
//! - Difficulty tiers and per-document score reports
//! - Feature sets derived from extracted text
//! - Library locations and batch results

pub mod batch;
pub mod features;
pub mod location;
pub mod report;
pub mod tier;

pub use batch::{BatchReport, DocumentResult, TierHistogram};
pub use features::FeatureSet;
pub use location::SheetLocation;
pub use report::{FailurePolicy, ScoreOutcome, ScoreReport};
pub use tier::Tier;
