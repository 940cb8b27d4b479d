//! Test Helper Utilities
//!
//! Shared utilities for testing psd-grader

#![allow(dead_code)]

pub mod library;
pub mod log_capture;
