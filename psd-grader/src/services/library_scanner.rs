//! Library discovery
//!
//! Finds sheet documents laid out as
//! `<root>/<category>/<song>/<tier>/<subcategory>/<file>.pdf`, keeping only
//! configured categories, the configured subcategory and (optionally) one
//! tier folder.

use super::file_scanner::{FileScanner, ScanError};
use crate::error::GraderResult;
use crate::models::{SheetLocation, Tier};
use psd_common::config::LibraryConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Depth of a document below its category folder (`song/tier/sub/file`)
const CATEGORY_DOCUMENT_DEPTH: usize = 4;

pub struct LibraryScanner {
    root: PathBuf,
    layout: LibraryConfig,
    tier_filter: Option<Tier>,
    file_scanner: FileScanner,
}

impl LibraryScanner {
    pub fn new(root: impl Into<PathBuf>, layout: LibraryConfig) -> Self {
        Self {
            root: root.into(),
            layout,
            tier_filter: None,
            file_scanner: FileScanner::new().with_max_depth(CATEGORY_DOCUMENT_DEPTH),
        }
    }

    /// Only return documents currently filed under `tier` (None = every tier)
    pub fn with_tier_filter(mut self, tier: Option<Tier>) -> Self {
        self.tier_filter = tier;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover documents, sorted by path
    ///
    /// A missing library root is an error; a missing category folder is not.
    pub fn discover(&self) -> GraderResult<Vec<SheetLocation>> {
        if !self.root.exists() {
            return Err(ScanError::PathNotFound(self.root.clone()).into());
        }
        if !self.root.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()).into());
        }

        let mut locations = Vec::new();

        for category in &self.layout.categories {
            let category_path = self.root.join(category);
            if !category_path.is_dir() {
                debug!(category = %category, "Category folder missing, skipping");
                continue;
            }

            for path in self.file_scanner.scan(&category_path)? {
                match SheetLocation::from_path(&self.root, &path) {
                    Some(location) if self.accepts(&location) => locations.push(location),
                    Some(_) => {}
                    None => debug!(path = %path.display(), "Not in library layout, skipping"),
                }
            }
        }

        locations.sort();

        info!(
            root = %self.root.display(),
            documents = locations.len(),
            "Library scan complete"
        );

        Ok(locations)
    }

    fn accepts(&self, location: &SheetLocation) -> bool {
        if location.subcategory != self.layout.subcategory {
            return false;
        }

        match self.tier_filter {
            Some(tier) => location.current_tier() == Some(tier),
            None => true,
        }
    }
}
