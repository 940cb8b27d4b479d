//! Grading services
//!
//! Discovery, batch grading and relocation of library documents.

pub mod batch;
pub mod file_scanner;
pub mod library_scanner;
pub mod relocation;

pub use batch::{score_document, BatchScorer};
pub use file_scanner::{FileScanner, ScanError};
pub use library_scanner::LibraryScanner;
pub use relocation::{apply_plan, plan_moves, ApplyReport, MovePlan, PlannedMove, RelocationError};
