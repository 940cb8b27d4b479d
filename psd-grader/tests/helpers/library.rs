//! Sheet library fixtures
//!
//! Builds `<root>/<category>/<song>/<tier>/Piano/<file>.pdf` trees in a
//! temp dir. Sheets are fake PDFs: the `%PDF-` header (so the scanner
//! accepts them) followed by page texts, read back by [`StubExtractor`].

use psd_grader::extractors::{ExtractedText, ExtractionError, TextExtractor};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "%PDF-1.4\n";
const PAGE_BREAK: &str = "\n<page>\n";
const CORRUPT_MARKER: &str = "<corrupt>";

/// 1 page, no marks: score 0
pub const EASY_SHEET: &[&str] = &["Minuet in G"];

/// 2 pages, fast tempo, two notation marks: score 3
pub const MEDIUM_SHEET: &[&str] = &["Allegro, legato", "trill"];

/// 3 pages, fast tempo, four notation marks, 25 sharps: score 7
pub const HARD_SHEET: &[&str] = &[
    "Presto",
    "staccato trill mordent arpeggio",
    "#########################",
];

pub struct Library {
    dir: TempDir,
}

impl Library {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a sheet under `<category>/<song>/<tier>/Piano/<file>`
    pub fn add_sheet(&self, category: &str, song: &str, tier: &str, file: &str, pages: &[&str]) -> PathBuf {
        let body = format!("{}{}", HEADER, pages.join(PAGE_BREAK));
        self.write(&format!("{}/{}/{}/Piano/{}", category, song, tier, file), body.as_bytes())
    }

    /// Write a sheet the stub extractor fails on
    pub fn add_corrupt(&self, category: &str, song: &str, tier: &str, file: &str) -> PathBuf {
        let body = format!("{}{}", HEADER, CORRUPT_MARKER);
        self.write(&format!("{}/{}/{}/Piano/{}", category, song, tier, file), body.as_bytes())
    }

    /// Write raw bytes at a path relative to the root
    pub fn write(&self, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, bytes).unwrap();
        path
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }
}

/// Reads the page texts written by [`Library::add_sheet`]
pub struct StubExtractor;

impl TextExtractor for StubExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        let body = fs::read_to_string(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let text = body
            .strip_prefix(HEADER)
            .ok_or_else(|| ExtractionError::Pdf("missing header".to_string()))?;
        if text.contains(CORRUPT_MARKER) {
            return Err(ExtractionError::Pdf("corrupt xref table".to_string()));
        }

        Ok(ExtractedText {
            page_texts: text.split(PAGE_BREAK).map(str::to_string).collect(),
        })
    }
}
