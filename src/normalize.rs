// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Name normalization before inference
//!
//! Posting tools often replace directory and file names with random labels
//! (`a8f3k2j9`). Such labels carry nothing for inference, so they are
//! dropped from the name handed to the engine. The file on disk is untouched.

use std::path::{Component, Path};
use tracing::{debug, info};

use crate::{Result, SortError};

/// Stem used in place of an obfuscated file name
const PLACEHOLDER_STEM: &str = "-";

/// A name part is obfuscated when it has no word separators at all
pub fn is_obfuscated(part: &str) -> bool {
    !part.contains(['.', '_', ' '])
}

/// Split a file name into stem and extension (with leading dot)
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name.split_at(idx),
        _ => (file_name, ""),
    }
}

/// Build the name handed to inference for `file`
///
/// The result is `file` relative to the parent of `download_dir`, with
/// obfuscated components removed and `/` as separator. When every
/// component is obfuscated the release name plus the file's extension is
/// used instead.
pub fn deobfuscate(file: &Path, download_dir: &Path, release_name: &str) -> Result<String> {
    let base = download_dir.parent().unwrap_or(download_dir);
    let relative = file.strip_prefix(base).map_err(|_| {
        SortError::InvalidPath(format!(
            "{} is not inside {}",
            file.display(),
            base.display()
        ))
    })?;

    let mut parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    debug!("Stripped file name: {:?}", parts);

    let file_name = match parts.pop() {
        Some(name) => name,
        None => return Err(SortError::InvalidPath(file.display().to_string())),
    };
    let (stem, ext) = split_extension(&file_name);
    let total = parts.len() + 1;

    let mut kept: Vec<String> = Vec::with_capacity(total);
    for dir in parts {
        if is_obfuscated(&dir) {
            info!("Detected obfuscated directory name {}, removing from guess path", dir);
        } else {
            kept.push(dir);
        }
    }
    let kept_dirs = kept.len();

    let file_obfuscated = is_obfuscated(stem);
    if file_obfuscated {
        info!("Detected obfuscated file name {}, removing from guess path", file_name);
        kept.push(format!("{}{}", PLACEHOLDER_STEM, ext));
    } else {
        kept.push(file_name.clone());
    }

    if kept_dirs == 0 && file_obfuscated {
        info!("All file path parts are obfuscated, using release name");
        return Ok(format!("{}{}", release_name, ext));
    }

    Ok(kept.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn downloads() -> PathBuf {
        PathBuf::from("/data/complete/Show.Name.S01E02.720p")
    }

    #[test]
    fn test_plain_name_is_kept() {
        let file = downloads().join("Show.Name.S01E02.720p.mkv");
        let name = deobfuscate(&file, &downloads(), "Show.Name.S01E02.720p").unwrap();
        assert_eq!(name, "Show.Name.S01E02.720p/Show.Name.S01E02.720p.mkv");
    }

    #[test]
    fn test_obfuscated_parts_are_removed() {
        let file = downloads().join("a8f3k2j9").join("x7qq91.mkv");
        let name = deobfuscate(&file, &downloads(), "Show.Name.S01E02.720p").unwrap();
        assert_eq!(name, "Show.Name.S01E02.720p/-.mkv");
    }

    #[test]
    fn test_all_parts_obfuscated_uses_release_name() {
        let dir = PathBuf::from("/data/complete/abc123");
        let file = dir.join("x7qq91.mkv");
        let name = deobfuscate(&file, &dir, "Movie.Title.2010").unwrap();
        assert_eq!(name, "Movie.Title.2010.mkv");
    }

    #[test]
    fn test_file_outside_download_dir() {
        let file = PathBuf::from("/elsewhere/file.mkv");
        assert!(deobfuscate(&file, &downloads(), "x").is_err());
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("a.b.mkv"), ("a.b", ".mkv"));
        assert_eq!(split_extension("noext"), ("noext", ""));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
    }
}
