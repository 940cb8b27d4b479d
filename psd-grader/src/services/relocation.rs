//! Tier relocation
//!
//! Moves graded documents into the tier folder matching their grade:
//! `<song>/<current tier>/<sub>/<file>` becomes `<song>/<suggested tier>/<sub>/<file>`.
//!
//! Planning ([`plan_moves`]) is pure and can be printed as a dry run.
//! Applying ([`apply_plan`]) touches the filesystem one move at a time; a
//! failed move is recorded and the rest of the plan continues.

use crate::models::{DocumentResult, Tier};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum RelocationError {
    /// Refusing to overwrite an existing file
    #[error("Target already exists: {0}")]
    TargetExists(PathBuf),

    #[error("Cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One document to move
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    pub from: PathBuf,
    pub to: PathBuf,
    pub song_dir: PathBuf,
    pub current_tier: Tier,
    pub target_tier: Tier,
    /// Source directories to remove once empty, innermost first
    pub prune: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MovePlan {
    pub moves: Vec<PlannedMove>,
}

impl MovePlan {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }
}

/// Outcome of applying a plan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    /// Destination paths of successful moves
    pub moved: Vec<PathBuf>,
    /// Source path and error message of each failed move
    pub failed: Vec<(PathBuf, String)>,
    /// Directories removed after becoming empty
    pub pruned: Vec<PathBuf>,
}

/// Plan moves for every document whose grade differs from its tier folder
///
/// Documents in an unrecognized tier folder are left alone, and so are
/// documents whose text could not be extracted: their Easy grade says
/// nothing about the sheet.
pub fn plan_moves(results: &[DocumentResult]) -> MovePlan {
    let moves = results
        .iter()
        .filter_map(|result| {
            if result.extraction_failed {
                debug!(path = %result.location.path.display(), "Unreadable document, not moving");
                return None;
            }

            let current_tier = result.current_tier?;
            let target_tier = result.suggested_tier();
            if current_tier == target_tier {
                return None;
            }

            let location = &result.location;
            let to = location
                .song_dir
                .join(target_tier.as_str())
                .join(&location.subcategory)
                .join(&location.file_name);

            Some(PlannedMove {
                from: location.path.clone(),
                to,
                song_dir: location.song_dir.clone(),
                current_tier,
                target_tier,
                prune: vec![
                    location.subcategory_dir(),
                    location.song_dir.join(&location.tier_dir),
                ],
            })
        })
        .collect();

    MovePlan { moves }
}

/// Execute a plan
pub fn apply_plan(plan: &MovePlan) -> ApplyReport {
    let mut report = ApplyReport::default();

    for planned in &plan.moves {
        match apply_move(planned) {
            Ok(()) => {
                info!(
                    from = %planned.from.display(),
                    to = %planned.to.display(),
                    tier = %planned.target_tier,
                    "Moved document"
                );
                report.moved.push(planned.to.clone());
                report.pruned.extend(prune_empty_dirs(&planned.prune));
            }
            Err(e) => {
                warn!(from = %planned.from.display(), error = %e, "Move failed");
                report.failed.push((planned.from.clone(), e.to_string()));
            }
        }
    }

    info!(
        moved = report.moved.len(),
        failed = report.failed.len(),
        pruned = report.pruned.len(),
        "Relocation complete"
    );

    report
}

fn apply_move(planned: &PlannedMove) -> Result<(), RelocationError> {
    if planned.to.symlink_metadata().is_ok() {
        return Err(RelocationError::TargetExists(planned.to.clone()));
    }

    let mut created = CreatedDirs::default();
    if let Some(parent) = planned.to.parent() {
        created.create_all(parent)?;
    }

    move_file(&planned.from, &planned.to)?;
    created.commit();
    Ok(())
}

/// Rename, falling back to copy + remove when rename fails (e.g. across devices)
fn move_file(from: &Path, to: &Path) -> Result<(), RelocationError> {
    let rename_err = match fs::rename(from, to) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    debug!(from = %from.display(), error = %rename_err, "Rename failed, trying copy");

    let move_err = |source| RelocationError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if fs::copy(from, to).is_err() {
        let _ = fs::remove_file(to);
        return Err(move_err(rename_err));
    }

    if let Err(e) = fs::remove_file(from) {
        let _ = fs::remove_file(to);
        return Err(move_err(e));
    }

    Ok(())
}

/// Remove each directory if it is empty, stopping at the first that is not
fn prune_empty_dirs(dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut pruned = Vec::new();

    for dir in dirs {
        let is_empty = match fs::read_dir(dir) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => false,
        };
        if !is_empty {
            break;
        }

        match fs::remove_dir(dir) {
            Ok(()) => {
                debug!(dir = %dir.display(), "Removed empty directory");
                pruned.push(dir.clone());
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Cannot remove empty directory");
                break;
            }
        }
    }

    pruned
}

/// Directories created for one move, removed on drop unless committed
#[derive(Debug, Default)]
struct CreatedDirs {
    dirs: Vec<PathBuf>,
}

impl CreatedDirs {
    /// Create `dir` and any missing ancestors, remembering which were new
    fn create_all(&mut self, dir: &Path) -> Result<(), RelocationError> {
        let missing: Vec<&Path> = dir.ancestors().take_while(|d| !d.exists()).collect();

        for path in missing.into_iter().rev() {
            match fs::create_dir(path) {
                Ok(()) => self.dirs.push(path.to_path_buf()),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                Err(source) => {
                    return Err(RelocationError::CreateDir {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }

        Ok(())
    }

    fn commit(mut self) {
        self.dirs.clear();
    }
}

impl Drop for CreatedDirs {
    fn drop(&mut self) {
        for dir in self.dirs.iter().rev() {
            if let Err(e) = fs::remove_dir(dir) {
                warn!(dir = %dir.display(), error = %e, "Cannot roll back created directory");
            }
        }
    }
}
