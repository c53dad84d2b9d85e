// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for VideoSort

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::classify::Classification;

/// Main sorting configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SortConfig {
    /// Destination directories per classification
    #[serde(default)]
    pub destinations: DestinationConfig,

    /// Formatting templates per classification
    #[serde(default)]
    pub formats: FormatConfig,

    /// Video and satellite extensions
    #[serde(default)]
    pub extensions: ExtensionConfig,

    /// Title casing and episode numbering
    #[serde(default)]
    pub naming: NamingConfig,

    /// Move, cleanup and matching policies
    #[serde(default)]
    pub rules: RuleConfig,

    /// Categories that force "other TV" sorting for movie-like names
    #[serde(default = "default_tv_categories")]
    pub tv_categories: Vec<String>,
}

/// Destination directories. An empty entry means "next to the download directory".
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DestinationConfig {
    #[serde(default)]
    pub movies: String,
    #[serde(default)]
    pub series: String,
    #[serde(default)]
    pub dated: String,
    #[serde(default)]
    pub other_tv: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FormatConfig {
    #[serde(default = "default_movies_format")]
    pub movies: String,
    #[serde(default = "default_series_format")]
    pub series: String,
    #[serde(default = "default_dated_format")]
    pub dated: String,
    #[serde(default = "default_other_tv_format")]
    pub other_tv: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExtensionConfig {
    #[serde(default = "default_video_extensions")]
    pub video: Vec<String>,
    #[serde(default = "default_satellite_extensions")]
    pub satellite: Vec<String>,
    /// Satellite extensions probed for a subtitle language
    #[serde(default = "default_subtitle_extensions")]
    pub subtitle: Vec<String>,
    /// Satellite extensions eligible for deep scanning
    #[serde(default = "default_info_extensions")]
    pub info: Vec<String>,
}

/// How a file holding several episodes renders `%e` / `%0e`
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MultiEpisodeMode {
    /// First and last episode joined by the separator
    #[default]
    Range,
    /// Every episode joined by the separator
    List,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NamingConfig {
    #[serde(default)]
    pub multiple_episodes: MultiEpisodeMode,
    #[serde(default = "default_episode_separator")]
    pub episode_separator: String,
    /// Treat a year following the show name as part of the name
    #[serde(default = "default_true")]
    pub series_year: bool,
    #[serde(default = "default_lower_words")]
    pub lower_words: Vec<String>,
    #[serde(default = "default_upper_words")]
    pub upper_words: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RuleConfig {
    /// Smaller video files are ignored
    #[serde(default = "default_min_size_mb")]
    pub min_size_mb: u64,
    #[serde(default)]
    pub overwrite: bool,
    /// Delete the download directory after a clean run
    #[serde(default = "default_true")]
    pub cleanup: bool,
    /// Log destinations without touching the file system
    #[serde(default)]
    pub preview: bool,
    /// Infer from the batch name when only one video qualifies
    #[serde(default)]
    pub prefer_batch_name: bool,
    /// Apply indexer-supplied hints over inferred attributes
    #[serde(default = "default_true")]
    pub external_hints: bool,
    /// Match info files by content when their names differ
    #[serde(default = "default_true")]
    pub deep_scan: bool,
}

// Default value functions
fn default_true() -> bool { true }
fn default_min_size_mb() -> u64 { 100 }
fn default_episode_separator() -> String { "E".to_string() }
fn default_movies_format() -> String { "%t (%y)".to_string() }
fn default_series_format() -> String { "%sn/Season %s/%sn - S%0sE%0e - %en".to_string() }
fn default_dated_format() -> String { "%sn/%sn - %y-%0m-%0d".to_string() }
fn default_other_tv_format() -> String { "%t".to_string() }

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_tv_categories() -> Vec<String> {
    strings(&["tv"])
}

fn default_video_extensions() -> Vec<String> {
    strings(&[
        ".mkv", ".avi", ".divx", ".xvid", ".mov", ".wmv", ".mp4", ".mpg", ".mpeg", ".vob", ".iso",
    ])
}

fn default_satellite_extensions() -> Vec<String> {
    strings(&[".srt", ".sub"])
}

fn default_subtitle_extensions() -> Vec<String> {
    strings(&[".srt", ".idx", ".sub", ".ssa", ".ass"])
}

fn default_info_extensions() -> Vec<String> {
    strings(&[".nfo"])
}

fn default_lower_words() -> Vec<String> {
    strings(&["the", "of", "and", "at", "vs", "a", "an", "but", "nor", "for", "on", "so", "yet"])
}

fn default_upper_words() -> Vec<String> {
    strings(&["III", "II", "IV"])
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            destinations: DestinationConfig::default(),
            formats: FormatConfig::default(),
            extensions: ExtensionConfig::default(),
            naming: NamingConfig::default(),
            rules: RuleConfig::default(),
            tv_categories: default_tv_categories(),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            movies: default_movies_format(),
            series: default_series_format(),
            dated: default_dated_format(),
            other_tv: default_other_tv_format(),
        }
    }
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            video: default_video_extensions(),
            satellite: default_satellite_extensions(),
            subtitle: default_subtitle_extensions(),
            info: default_info_extensions(),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            multiple_episodes: MultiEpisodeMode::default(),
            episode_separator: default_episode_separator(),
            series_year: true,
            lower_words: default_lower_words(),
            upper_words: default_upper_words(),
        }
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            min_size_mb: default_min_size_mb(),
            overwrite: false,
            cleanup: true,
            preview: false,
            prefer_batch_name: false,
            external_hints: true,
            deep_scan: true,
        }
    }
}

impl ExtensionConfig {
    /// Check whether `ext` (with or without leading dot, any case) is in `list`
    pub fn contains(list: &[String], ext: &str) -> bool {
        let wanted = normalize_extension(ext);
        !wanted.is_empty() && list.iter().any(|e| normalize_extension(e) == wanted)
    }

    pub fn is_video(&self, ext: &str) -> bool {
        Self::contains(&self.video, ext)
    }

    pub fn is_satellite(&self, ext: &str) -> bool {
        Self::contains(&self.satellite, ext)
    }

    pub fn is_subtitle(&self, ext: &str) -> bool {
        Self::contains(&self.subtitle, ext)
    }

    pub fn is_info(&self, ext: &str) -> bool {
        Self::contains(&self.info, ext)
    }
}

/// Lower-case an extension and make sure it starts with a dot
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.is_empty() || ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

impl RuleConfig {
    /// Minimum video size in bytes
    pub fn min_size_bytes(&self) -> u64 {
        self.min_size_mb << 20
    }
}

impl SortConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::SortError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings no batch could run with
    pub fn validate(&self) -> crate::Result<()> {
        for kind in Classification::ALL {
            if self.format_for(kind).trim().is_empty() {
                return Err(crate::SortError::Config(format!(
                    "Format for {} is empty",
                    kind
                )));
            }
        }

        if self.extensions.video.iter().all(|e| normalize_extension(e).is_empty()) {
            return Err(crate::SortError::Config(
                "No video extensions configured".to_string(),
            ));
        }

        Ok(())
    }

    /// Template used for a classification
    pub fn format_for(&self, kind: Classification) -> &str {
        match kind {
            Classification::Movie => &self.formats.movies,
            Classification::Series => &self.formats.series,
            Classification::Dated => &self.formats.dated,
            Classification::OtherTv => &self.formats.other_tv,
        }
    }

    /// Configured destination directory for a classification (may be empty)
    pub fn destination_for(&self, kind: Classification) -> &str {
        match kind {
            Classification::Movie => &self.destinations.movies,
            Classification::Series => &self.destinations.series,
            Classification::Dated => &self.destinations.dated,
            Classification::OtherTv => &self.destinations.other_tv,
        }
    }

    /// Whether a download category forces TV sorting
    pub fn is_tv_category(&self, category: &str) -> bool {
        let category = category.trim().to_lowercase();
        self.tv_categories
            .iter()
            .any(|c| c.trim().to_lowercase() == category)
    }
}
