// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Batch driver
//!
//! Sorts every qualifying video of one download directory: scan, resolve a
//! destination, move the video and its satellites, then clean up. A failing
//! file is logged and flags the batch; the remaining files still run.

use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::config::SortConfig;
use crate::guess::{guess_info, ExternalHints, Guess, GuessContext};
use crate::inference::InferenceEngine;
use crate::mapping::{build_mapping, MappingSource};
use crate::normalize::split_extension;
use crate::planner::{dupe_separator, BatchContext, MoveRecord};
use crate::render::{destination, destination_dir};
use crate::satellite::{find_satellites, SatelliteContext};
use crate::Result;

/// One download to sort
#[derive(Debug, Clone, Default)]
pub struct BatchJob {
    pub download_dir: PathBuf,
    /// Name of the download as the indexer knows it
    pub release_name: String,
    pub category: String,
    pub hints: ExternalHints,
}

impl BatchJob {
    /// A job named after its directory
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        let download_dir = download_dir.into();
        let release_name = download_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            download_dir,
            release_name,
            ..Default::default()
        }
    }

    fn dir_name(&self) -> String {
        self.download_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// How a batch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    Success,
    NothingMoved,
    Failed,
}

impl BatchOutcome {
    /// Process exit status reported to the host
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Success => 93,
            Self::Failed => 94,
            Self::NothingMoved => 95,
        }
    }
}

/// Result of [`Sorter::run`]
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub outcome: BatchOutcome,
    pub moves: Vec<MoveRecord>,
    pub final_dirs: Vec<PathBuf>,
}

/// Where one file would go
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub guess: Guess,
    /// Template used, empty when the file could not be classified
    pub template: String,
    /// `None` when unclassified or already in place
    pub destination: Option<PathBuf>,
}

/// Sorts batches with one configuration and inference engine
pub struct Sorter<'a> {
    config: &'a SortConfig,
    engine: &'a dyn InferenceEngine,
}

impl<'a> Sorter<'a> {
    pub fn new(config: &'a SortConfig, engine: &'a dyn InferenceEngine) -> Self {
        Self { config, engine }
    }

    /// Sort every video of `job`, writing host lines to stdout
    pub fn run(&self, job: &BatchJob) -> BatchReport {
        self.run_with_output(job, &mut io::stdout().lock())
    }

    /// Sort every video of `job`, writing host lines to `out`
    pub fn run_with_output(&self, job: &BatchJob, out: &mut dyn Write) -> BatchReport {
        let mut ctx = BatchContext::new(self.config.rules.preview, self.config.rules.overwrite);
        if ctx.preview {
            warn!("PREVIEW MODE - files will not be moved");
        }

        let videos = self.scan(job, &mut ctx);
        let use_batch_name = self.config.rules.prefer_batch_name && videos.len() == 1;

        for video in &videos {
            if let Err(e) = self.process_file(job, video, use_batch_name, &mut ctx, out) {
                ctx.errors = true;
                error!("Failed: {}: {}", video.display(), e);
            }
        }

        let final_dirs = ctx.final_dirs();
        if !final_dirs.is_empty() {
            let joined = final_dirs
                .iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join("|");
            if let Err(e) = writeln!(out, "[NZB] FINALDIR={}", joined) {
                error!("Failed to report final directories: {}", e);
            }
        }

        if self.config.rules.cleanup && ctx.files_moved && !ctx.errors {
            if let Err(e) = self.cleanup_download_dir(job, &ctx) {
                ctx.errors = true;
                error!("Cleanup failed: {}", e);
            }
        }

        let outcome = if ctx.errors {
            BatchOutcome::Failed
        } else if ctx.files_moved {
            BatchOutcome::Success
        } else {
            BatchOutcome::NothingMoved
        };
        info!(?outcome, moves = ctx.moves().len(), "Batch finished");

        BatchReport {
            outcome,
            moves: ctx.moves().to_vec(),
            final_dirs,
        }
    }

    /// Videos with a configured extension and at least the minimum size
    fn scan(&self, job: &BatchJob, ctx: &mut BatchContext) -> Vec<PathBuf> {
        let min_size = self.config.rules.min_size_bytes();
        let mut videos = Vec::new();

        for entry in WalkDir::new(&job.download_dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    ctx.errors = true;
                    error!("Failed to scan {}: {}", job.download_dir.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !self.config.extensions.is_video(split_extension(&file_name).1) {
                continue;
            }

            match entry.metadata() {
                Ok(meta) if meta.len() < min_size => {
                    info!("Skipping small: {}", file_name);
                }
                Ok(_) => videos.push(entry.into_path()),
                Err(e) => {
                    ctx.errors = true;
                    error!("Failed: {}: {}", file_name, e);
                }
            }
        }

        debug!("Found {} video file(s)", videos.len());
        videos
    }

    /// Infer, classify and render the destination of one file
    pub fn resolve(&self, job: &BatchJob, file: &Path, use_batch_name: bool) -> Result<Resolution> {
        let hints = (self.config.rules.external_hints && !job.hints.is_empty()).then_some(&job.hints);
        let ctx = GuessContext {
            download_dir: &job.download_dir,
            release_name: &job.release_name,
            use_batch_name,
            force_tv: self.config.is_tv_category(&job.category),
            series_year: self.config.naming.series_year,
            hints,
        };
        let guess = guess_info(self.engine, file, &ctx)?;

        let classification = match guess.classification {
            Some(classification) => classification,
            None => {
                info!("Could not determine video type for {}", file.display());
                return Ok(Resolution {
                    guess,
                    template: String::new(),
                    destination: None,
                });
            }
        };

        let dir_name = job.dir_name();
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let source = MappingSource {
            dir_name: &dir_name,
            file_name: &file_name,
            category: &job.category,
        };

        let mapping = build_mapping(classification, &guess.attributes, &source, &self.config.naming);
        let template = self.config.format_for(classification).to_string();
        let dest_dir = destination_dir(self.config.destination_for(classification), &job.download_dir);
        let destination = destination(file, &template, &mapping, &dest_dir);

        Ok(Resolution {
            guess,
            template,
            destination,
        })
    }

    fn process_file(
        &self,
        job: &BatchJob,
        video: &Path,
        use_batch_name: bool,
        ctx: &mut BatchContext,
        out: &mut dyn Write,
    ) -> Result<()> {
        let resolution = self.resolve(job, video, use_batch_name)?;
        let dest = match resolution.destination {
            Some(dest) => dest,
            None => return Ok(()),
        };

        let separator = dupe_separator(&resolution.template);
        let moved_to = ctx.rename(video, &dest, separator)?;
        ctx.files_moved = true;
        writeln!(out, "destination path: {}", moved_to.display())?;

        if self.config.extensions.satellite.is_empty() {
            return Ok(());
        }

        let satellites = SatelliteContext {
            engine: self.engine,
            extensions: &self.config.extensions,
            release_name: &job.release_name,
            deep_scan: self.config.rules.deep_scan,
        };
        for satellite in find_satellites(&satellites, video, &moved_to)? {
            ctx.rename(&satellite.source, &satellite.destination, separator)?;
        }

        Ok(())
    }

    /// Delete the download directory unless a large file would be lost
    fn cleanup_download_dir(&self, job: &BatchJob, ctx: &BatchContext) -> Result<()> {
        debug!("Cleanup");
        let min_size = self.config.rules.min_size_bytes();

        let mut files = Vec::new();
        for entry in WalkDir::new(&job.download_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let kept = !ctx.preview || !ctx.was_moved(entry.path());
            if entry.metadata()?.len() >= min_size && kept {
                warn!("Skipping clean up due to large files remaining in the directory");
                return Ok(());
            }
            files.push(entry.into_path());
        }

        for file in files {
            if ctx.preview && ctx.was_moved(&file) {
                continue;
            }
            if !ctx.preview {
                fs::remove_file(&file)?;
            }
            info!("Deleted: {}", file.display());
        }

        if !ctx.preview {
            fs::remove_dir_all(&job.download_dir)?;
        }
        info!("Deleted: {}", job.download_dir.display());

        Ok(())
    }
}
