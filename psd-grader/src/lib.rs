//! psd-grader library interface
//!
//! Grades piano sheet PDFs as Easy, Medium or Hard from text extracted out
//! of the document, and reorganizes a sheet library by grade.

pub mod config;
pub mod error;
pub mod extractors;
pub mod models;
pub mod scoring;
pub mod services;

pub use crate::error::{GraderError, GraderResult};
