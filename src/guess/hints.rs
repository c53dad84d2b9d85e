// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Indexer-supplied hints that override inferred attributes

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rules::remove_year;
use crate::classify::Classification;
use crate::inference::{MediaKind, RawAttributes};

static IMDB_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://(?:www\.)?imdb\.com/title/(tt[0-9]+)/?$").unwrap()
});

/// Values that win over whatever inference found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proper_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_year: Option<u32>,
    /// Free-text info block, usually a database URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more_info: Option<String>,
}

impl ExternalHints {
    pub fn is_empty(&self) -> bool {
        self.proper_name.is_none()
            && self.episode_name.is_none()
            && self.movie_year.is_none()
            && self.more_info.is_none()
    }
}

/// Overlay `hints` onto classified attributes
pub fn apply_hints(
    attrs: &mut RawAttributes,
    classification: Option<Classification>,
    hints: &ExternalHints,
    series_year: bool,
) {
    let is_series = classification == Some(Classification::Series);

    if let Some(name) = non_empty(&hints.proper_name) {
        debug!("Using proper name hint");
        attrs.title = Some(if is_series && !series_year {
            remove_year(name)
        } else {
            name.to_string()
        });
    }

    if let Some(name) = non_empty(&hints.episode_name) {
        if is_series {
            debug!("Using episode name hint");
            attrs.episode_title = Some(name.to_string());
        }
    }

    if let Some(year) = hints.movie_year {
        debug!("Using movie year hint");
        attrs.year = Some(year);
    }

    if let Some(info) = non_empty(&hints.more_info) {
        if attrs.kind == Some(MediaKind::Movie) {
            if let Some(caps) = IMDB_URL_RE.captures(info.trim()) {
                let imdb = caps[1].to_string();
                debug!(imdb = %imdb, "Using more-info hint");
                attrs.cp_imdb = Some(format!("cp({})", imdb));
                attrs.imdb = Some(imdb);
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
