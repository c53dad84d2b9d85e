// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for VideoSort

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for VideoSort operations
pub type Result<T> = std::result::Result<T, SortError>;

/// VideoSort error types
#[derive(Error, Debug)]
pub enum SortError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("No free duplicate name left for {0:?}")]
    CollisionExhausted(PathBuf),
}
