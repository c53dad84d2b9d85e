// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Rename/move planning and the per-batch move ledger

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::normalize::split_extension;
use crate::{Result, SortError};

/// Highest `(n)` suffix tried before giving up on a name
pub const MAX_DUPLICATE_SUFFIX: u32 = 10_000;

/// A single move performed (or planned, in preview) during a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// State shared by every file of one batch
#[derive(Debug, Default)]
pub struct BatchContext {
    moves: Vec<MoveRecord>,
    /// A file failed; cleanup is disabled
    pub errors: bool,
    /// At least one video was moved
    pub files_moved: bool,
    pub preview: bool,
    pub overwrite: bool,
}

impl BatchContext {
    pub fn new(preview: bool, overwrite: bool) -> Self {
        Self {
            preview,
            overwrite,
            ..Default::default()
        }
    }

    /// Every move so far, in order
    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Whether an earlier move of this batch already targets `dest`
    pub fn is_planned(&self, dest: &Path) -> bool {
        self.moves.iter().any(|m| m.destination == dest)
    }

    /// Whether `source` was moved by this batch
    pub fn was_moved(&self, source: &Path) -> bool {
        self.moves.iter().any(|m| m.source == source)
    }

    /// Destination directories in first-seen order
    pub fn final_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        for record in &self.moves {
            if let Some(dir) = record.destination.parent() {
                if !dirs.iter().any(|d| d == dir) {
                    dirs.push(dir.to_path_buf());
                }
            }
        }
        dirs
    }

    /// Move `source` to `dest`, or to a free `(n)` variant of it
    ///
    /// Returns the path actually used.
    pub fn rename(&mut self, source: &Path, dest: &Path, separator: char) -> Result<PathBuf> {
        let mut target = dest.to_path_buf();

        if target.exists() || self.is_planned(&target) {
            if self.overwrite && !self.is_planned(&target) {
                if !self.preview {
                    fs::remove_file(&target)?;
                    move_file(source, &target)?;
                }
                info!("Overwrote: {}", target.display());
                self.record(source, &target);
                return Ok(target);
            }
            target = self.unique_name(&target, separator, MAX_DUPLICATE_SUFFIX)?;
        }

        if !self.preview {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            move_file(source, &target)?;
        }
        info!("Moved: {}", target.display());

        self.record(source, &target);
        Ok(target)
    }

    fn record(&mut self, source: &Path, destination: &Path) {
        self.moves.push(MoveRecord {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }

    /// First `<stem><sep>(<n>)<ext>` with `n >= 2` that is free on disk and in the ledger
    fn unique_name(&self, dest: &Path, separator: char, limit: u32) -> Result<PathBuf> {
        let file_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SortError::InvalidPath(dest.display().to_string()))?;
        let (stem, ext) = split_extension(&file_name);

        for n in 2..=limit {
            let candidate = dest.with_file_name(format!("{}{}({}){}", stem, separator, n, ext));
            if !candidate.exists() && !self.is_planned(&candidate) {
                debug!("Using duplicate name {}", candidate.display());
                return Ok(candidate);
            }
        }

        Err(SortError::CollisionExhausted(dest.to_path_buf()))
    }
}

/// Separator before a duplicate suffix, following the template's file-name style
pub fn dupe_separator(template: &str) -> char {
    let normalized = template.replace('\\', "/");
    let file_part = normalized.rsplit('/').next().unwrap_or(&normalized);

    if ["%.t", "%s.n", "%s.N"].iter().any(|t| file_part.contains(t)) {
        '.'
    } else if ["%_t", "%s_n", "%s_N"].iter().any(|t| file_part.contains(t)) {
        '_'
    } else {
        ' '
    }
}

/// Rename, falling back to copy and delete across file systems
pub fn move_file(source: &Path, dest: &Path) -> Result<()> {
    if let Err(e) = fs::rename(source, dest) {
        debug!("Rename failed ({}), performing copy: {}", e, dest.display());
        fs::copy(source, dest)?;
        fs::remove_file(source)?;
    }
    Ok(())
}
