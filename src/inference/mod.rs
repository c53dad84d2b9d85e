// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Attribute inference: the boundary to whatever guesses media attributes
//! from a release name.
//!
//! The sorter only talks to an [`InferenceEngine`]. Engines report what they
//! found and leave every other field absent; all defaults are applied by the
//! caller (see [`crate::guess`]).

pub mod language;
pub mod scene;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Result;

pub use scene::SceneNameEngine;

/// What the engine thinks the name describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Episode,
    Other,
}

/// Episode number(s) found in a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EpisodeNumber {
    Single(u32),
    /// Several episodes in one file, in name order
    Multiple(Vec<u32>),
}

impl EpisodeNumber {
    /// Build from a list; a one-element list collapses to `Single`
    pub fn from_list(mut episodes: Vec<u32>) -> Option<Self> {
        match episodes.len() {
            0 => None,
            1 => episodes.pop().map(Self::Single),
            _ => Some(Self::Multiple(episodes)),
        }
    }

    pub fn numbers(&self) -> Vec<u32> {
        match self {
            Self::Single(n) => vec![*n],
            Self::Multiple(list) => list.clone(),
        }
    }
}

/// Attributes inferred from a name. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<EpisodeNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_channels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_group: Option<String>,
    /// ISO 639-1 code of a subtitle language tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_language: Option<String>,
    /// IMDb title id (`tt0111161`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
    /// IMDb id formatted for CouchPotato (`cp(tt0111161)`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cp_imdb: Option<String>,
}

impl RawAttributes {
    /// Fill every absent field from `other`, keeping what is already set
    pub fn merge_missing(&mut self, other: RawAttributes) {
        macro_rules! fill {
            ($($field:ident),*) => {
                $(if self.$field.is_none() { self.$field = other.$field; })*
            };
        }
        fill!(
            kind, title, year, season, episode, episode_title, date, part, format,
            screen_size, video_codec, audio_codec, audio_channels, release_group,
            subtitle_language, imdb, cp_imdb
        );
    }
}

/// A single inference call
#[derive(Debug, Clone, Copy)]
pub struct InferenceRequest<'a> {
    /// Normalized name, possibly with `/`-separated directory components
    pub name: &'a str,
    /// Only look at the last path component
    pub filename_only: bool,
    /// Report a trailing language tag (subtitle files)
    pub detect_languages: bool,
}

impl<'a> InferenceRequest<'a> {
    /// Infer from a full relative path, languages disabled
    pub fn path(name: &'a str) -> Self {
        Self {
            name,
            filename_only: false,
            detect_languages: false,
        }
    }

    /// Infer from the file name alone
    pub fn filename(name: &'a str) -> Self {
        Self {
            name,
            filename_only: true,
            detect_languages: false,
        }
    }

    pub fn with_languages(mut self) -> Self {
        self.detect_languages = true;
        self
    }
}

/// Trait for attribute inference engines
pub trait InferenceEngine {
    /// Name of this engine
    fn name(&self) -> &'static str;

    /// Guess attributes for a name
    fn infer(&self, request: &InferenceRequest<'_>) -> Result<RawAttributes>;
}
