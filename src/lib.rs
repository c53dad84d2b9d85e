// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! VideoSort: media classification and path templating
//!
//! Sorts downloaded movies and TV shows into a directory layout described
//! by format templates. Names are normalized, run through an inference
//! engine, corrected and classified, then rendered into destination paths.
//! Subtitles and info files follow their video.

pub mod batch;
pub mod classify;
pub mod config;
pub mod error;
pub mod guess;
pub mod inference;
pub mod mapping;
pub mod normalize;
pub mod planner;
pub mod render;
pub mod satellite;

pub use batch::{BatchJob, BatchOutcome, BatchReport, Sorter};
pub use classify::Classification;
pub use config::SortConfig;
pub use error::{Result, SortError};
pub use inference::{InferenceEngine, RawAttributes, SceneNameEngine};
