//! PDF document scanner
//!
//! Recursive discovery of sheet PDFs. A file is a candidate when its
//! extension is `.pdf`; content is not checked here, so truncated or
//! garbled documents still reach the extractor and fail there.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Document scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// PDF document scanner
pub struct FileScanner {
    ignore_patterns: Vec<String>,
    max_depth: Option<usize>,
}

impl FileScanner {
    /// Create new file scanner with default ignore patterns
    ///
    /// Ignores system files like .DS_Store, Thumbs.db, .git, etc.
    pub fn new() -> Self {
        Self {
            ignore_patterns: vec![
                ".DS_Store".to_string(),
                "Thumbs.db".to_string(),
                ".git".to_string(),
                ".svn".to_string(),
                "node_modules".to_string(),
            ],
            max_depth: None,
        }
    }

    /// Limit recursion depth below the scan root
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Scan directory for PDF documents
    pub fn scan(&self, root_path: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root_path.exists() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory(root_path.to_path_buf()));
        }

        let mut symlink_visited = HashSet::new();
        let mut documents = Vec::new();

        let walker = WalkDir::new(root_path)
            .follow_links(false)
            .max_depth(self.max_depth.unwrap_or(usize::MAX))
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e, &mut symlink_visited));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if is_pdf_extension(path) {
                documents.push(path.to_path_buf());
            }
        }

        documents.sort();

        tracing::debug!(
            root = %root_path.display(),
            documents = documents.len(),
            "Scan complete"
        );

        Ok(documents)
    }

    /// Check if entry should be processed
    fn should_process_entry(
        &self,
        entry: &DirEntry,
        symlink_visited: &mut HashSet<PathBuf>,
    ) -> bool {
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy();

        for pattern in &self.ignore_patterns {
            if file_name.contains(pattern) {
                return false;
            }
        }

        if entry.file_type().is_symlink() {
            if let Ok(canonical) = path.canonicalize() {
                if !symlink_visited.insert(canonical) {
                    tracing::warn!("Symlink loop detected: {}", path.display());
                    return false;
                }
            }
        }

        true
    }
}

/// Candidate check by extension (case-insensitive)
fn is_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}
