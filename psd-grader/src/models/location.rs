//! Position of a sheet document inside the library tree

use super::Tier;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// A document at `<root>/<category>/<song>/<tier>/<subcategory>/<file>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SheetLocation {
    /// Full path to the document
    pub path: PathBuf,
    /// Song directory (`<root>/<category>/<song>`)
    pub song_dir: PathBuf,
    pub category: String,
    pub song: String,
    /// Tier directory name as found on disk
    pub tier_dir: String,
    pub subcategory: String,
    pub file_name: String,
}

impl SheetLocation {
    /// Parse a document path relative to the library root
    ///
    /// Returns `None` when the path is outside the root, is not exactly five
    /// levels deep, or has a non-UTF-8 component.
    pub fn from_path(library_root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(library_root).ok()?;

        let mut parts = Vec::with_capacity(5);
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?.to_string()),
                _ => return None,
            }
        }

        let [category, song, tier_dir, subcategory, file_name]: [String; 5] = parts.try_into().ok()?;

        Some(Self {
            path: path.to_path_buf(),
            song_dir: library_root.join(&category).join(&song),
            category,
            song,
            tier_dir,
            subcategory,
            file_name,
        })
    }

    /// Tier implied by the directory the document currently sits in
    pub fn current_tier(&self) -> Option<Tier> {
        self.tier_dir.parse().ok()
    }

    /// Directory holding the document (`<song>/<tier>/<subcategory>`)
    pub fn subcategory_dir(&self) -> PathBuf {
        self.song_dir.join(&self.tier_dir).join(&self.subcategory)
    }
}
