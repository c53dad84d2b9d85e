// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Media classification

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::inference::{MediaKind, RawAttributes};

/// Which template and destination a file is sorted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Movie,
    Series,
    Dated,
    OtherTv,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Movie,
        Classification::Series,
        Classification::Dated,
        Classification::OtherTv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Dated => "dated",
            Self::OtherTv => "othertv",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify corrected attributes. `None` means the file cannot be sorted.
pub fn classify(attrs: &RawAttributes, force_tv: bool) -> Option<Classification> {
    match attrs.kind? {
        MediaKind::Episode => Some(Classification::Series),
        MediaKind::Movie if attrs.date.is_some() => Some(Classification::Dated),
        MediaKind::Movie if force_tv => Some(Classification::OtherTv),
        MediaKind::Movie => Some(Classification::Movie),
        MediaKind::Other => None,
    }
}
