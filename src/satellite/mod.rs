// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Satellite files: subtitles and info files that follow their video
//!
//! A satellite follows a video when its stem (minus any language tag)
//! equals the video's stem. Info files with a different name can still
//! match through a deep scan of their content.

pub mod fuzzy;

use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::config::ExtensionConfig;
use crate::inference::{InferenceEngine, InferenceRequest, RawAttributes};
use crate::normalize::split_extension;
use crate::Result;

pub use fuzzy::similarity;

/// A deep-scan candidate must score above this
pub const DEEP_SCAN_THRESHOLD: f64 = 0.60;

/// Extension appended to words before inference
const DEEP_SCAN_EXTENSION: &str = ".nfo";

/// Best word found by a deep scan
#[derive(Debug, Clone, PartialEq)]
pub struct DeepScanMatch {
    pub word: String,
    pub ratio: f64,
    pub attributes: RawAttributes,
}

/// A satellite to move along with its video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatelliteFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// ISO 639-1 code when the name carried a language tag
    pub language: Option<String>,
}

/// What the associator needs from the batch
#[derive(Clone, Copy)]
pub struct SatelliteContext<'a> {
    pub engine: &'a dyn InferenceEngine,
    pub extensions: &'a ExtensionConfig,
    /// Compared against words of info files
    pub release_name: &'a str,
    pub deep_scan: bool,
}

/// Score every word of an info file against the release name
///
/// Unreadable files are logged and yield no match; words that are not
/// valid UTF-8 are skipped.
pub fn deep_scan(
    engine: &dyn InferenceEngine,
    path: &Path,
    release_name: &str,
    extensions: &ExtensionConfig,
) -> Option<DeepScanMatch> {
    debug!(
        "Deep scanning satellite: {} (threshold={:.2})",
        path.display(),
        DEEP_SCAN_THRESHOLD
    );

    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };

    let mut best: Option<DeepScanMatch> = None;

    for raw in content.split(|b| b.is_ascii_whitespace()) {
        if raw.is_empty() {
            continue;
        }
        let word = match std::str::from_utf8(raw) {
            Ok(word) => word,
            Err(_) => continue,
        };

        let name = format!("{}{}", word, DEEP_SCAN_EXTENSION);
        let attributes = match engine.infer(&InferenceRequest::filename(&name)) {
            Ok(attrs) if attrs.title.is_some() => attrs,
            Ok(_) => continue,
            Err(e) => {
                debug!("Skipping word {}: {}", word, e);
                continue;
            }
        };

        let candidate = strip_info_extension(word, extensions);
        let ratio = similarity(candidate, release_name);
        debug!("Tested: {} (ratio={:.2})", word, ratio);

        let best_ratio = best.as_ref().map_or(0.0, |b| b.ratio);
        if ratio > DEEP_SCAN_THRESHOLD && ratio > best_ratio {
            debug!("Possible match found: {} (ratio={:.2})", word, ratio);
            best = Some(DeepScanMatch {
                word: word.to_string(),
                ratio,
                attributes,
            });
        }
    }

    best
}

/// `Name.nfo` compares as `Name`
fn strip_info_extension<'w>(word: &'w str, extensions: &ExtensionConfig) -> &'w str {
    let (stem, ext) = split_extension(word);
    if !ext.is_empty() && extensions.is_info(ext) {
        stem
    } else {
        word
    }
}

/// Find the satellites of `video` and where they go, given the video's destination
pub fn find_satellites(
    ctx: &SatelliteContext<'_>,
    video: &Path,
    video_destination: &Path,
) -> Result<Vec<SatelliteFile>> {
    let root = match video.parent() {
        Some(root) => root,
        None => return Ok(Vec::new()),
    };
    debug!("Move satellites for {}", video.display());

    let video_name = file_name_of(video);
    let video_stem = split_extension(&video_name).0.to_lowercase();
    let dest_name = file_name_of(video_destination);
    let dest_stem = split_extension(&dest_name).0;

    let mut satellites = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        let (stem, ext) = split_extension(&file_name);
        if !ctx.extensions.is_satellite(ext) {
            continue;
        }

        let mut stem = stem.to_string();
        let mut language = None;

        if ctx.extensions.is_subtitle(ext) {
            let attrs = ctx
                .engine
                .infer(&InferenceRequest::filename(&file_name).with_languages())?;
            if let Some(code) = attrs.subtitle_language {
                if let Some(idx) = stem.rfind('.') {
                    stem.truncate(idx);
                }
                info!("Satellite: {} is a subtitle [{}]", file_name, code);
                language = Some(code);
            } else {
                debug!("Satellite: {} is a subtitle", file_name);
            }
        } else if ctx.deep_scan
            && ctx.extensions.is_info(ext)
            && stem.to_lowercase() != video_stem
            && deep_scan(ctx.engine, entry.path(), ctx.release_name, ctx.extensions).is_some()
        {
            stem = video_stem.clone();
        }

        if stem.to_lowercase() != video_stem {
            continue;
        }

        let suffix = language
            .as_ref()
            .map(|code| format!(".{}", code))
            .unwrap_or_default();
        let destination =
            video_destination.with_file_name(format!("{}{}{}", dest_stem, suffix, ext));
        debug!("Satellite: {}", destination.display());

        satellites.push(SatelliteFile {
            source: entry.path().to_path_buf(),
            destination,
            language,
        });
    }

    Ok(satellites)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
