//! # PSD Common Library
//!
//! Shared code for the piano sheet difficulty tools including:
//! - Error types
//! - Configuration loading and root folder resolution
//! - Tracing initialization

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
