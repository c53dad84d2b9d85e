// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Attribute inference adapter
//!
//! Wraps an [`InferenceEngine`] call with the corrections the sorter relies
//! on: a leading-digit workaround before the call, the ordered
//! [`rules`] after it, classification, then [`hints`].

pub mod hints;
pub mod rules;

use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::classify::{classify, Classification};
use crate::inference::{InferenceEngine, InferenceRequest, RawAttributes};
use crate::normalize::{self, split_extension};
use crate::{Result, SortError};

pub use hints::{apply_hints, ExternalHints};
pub use rules::{apply_rules, remove_year, RuleContext, UNKNOWN_YEAR};

/// Prepended to file names starting with a digit
const DIGIT_MARKER: char = 'T';

/// Per-batch inputs to [`guess_info`]
#[derive(Debug, Clone, Copy)]
pub struct GuessContext<'a> {
    pub download_dir: &'a Path,
    /// Batch name, also the fallback for fully obfuscated paths
    pub release_name: &'a str,
    /// Infer from the release name instead of the file path
    pub use_batch_name: bool,
    /// The category forces movie-like names into "other TV"
    pub force_tv: bool,
    pub series_year: bool,
    /// `None` when hints are disabled
    pub hints: Option<&'a ExternalHints>,
}

/// Corrected attributes for one file
#[derive(Debug, Clone, Serialize)]
pub struct Guess {
    /// Name handed to the engine
    pub name: String,
    pub attributes: RawAttributes,
    pub classification: Option<Classification>,
}

/// Infer, correct and classify the attributes of `file`
pub fn guess_info(
    engine: &dyn InferenceEngine,
    file: &Path,
    ctx: &GuessContext<'_>,
) -> Result<Guess> {
    let name = if ctx.use_batch_name {
        debug!("Using release name");
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}{}", ctx.release_name, split_extension(&file_name).1)
    } else {
        normalize::deobfuscate(file, ctx.download_dir, ctx.release_name)?
    };

    let (name, padded) = pad_leading_digit(&name);
    debug!(engine = engine.name(), "Guessing: {}", name);

    let mut attributes = engine
        .infer(&InferenceRequest::path(&name))
        .map_err(|e| SortError::Inference(format!("{} engine failed on {}: {}", engine.name(), name, e)))?;

    if padded {
        restore_leading_digit(&mut attributes, &name);
    }

    apply_rules(
        &mut attributes,
        &RuleContext {
            series_year: ctx.series_year,
        },
    );

    let classification = classify(&attributes, ctx.force_tv);

    if let Some(hints) = ctx.hints {
        apply_hints(&mut attributes, classification, hints, ctx.series_year);
    }

    debug!(name = %name, classification = ?classification, "Guessed attributes: {:?}", attributes);

    Ok(Guess {
        name,
        attributes,
        classification,
    })
}

/// Engines read a leading number as episode noise, so hide it behind a letter
fn pad_leading_digit(name: &str) -> (String, bool) {
    let (dir, file) = match name.rfind('/') {
        Some(idx) => name.split_at(idx + 1),
        None => ("", name),
    };

    if file.starts_with(|c: char| c.is_ascii_digit()) {
        (format!("{}{}{}", dir, DIGIT_MARKER, file), true)
    } else {
        (name.to_string(), false)
    }
}

fn restore_leading_digit(attrs: &mut RawAttributes, padded_name: &str) {
    let title = attrs
        .title
        .as_deref()
        .map(|t| t.strip_prefix(DIGIT_MARKER).unwrap_or(t).to_string())
        .filter(|t| !t.is_empty());

    attrs.title = title.or_else(|| {
        debug!("Using file name as title");
        let file = padded_name.rsplit('/').next().unwrap_or(padded_name);
        let stem = split_extension(file).0;
        stem.strip_prefix(DIGIT_MARKER)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    });
}
