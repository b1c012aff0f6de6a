// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Polybot.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Polybot operations.
#[derive(Debug, Error)]
pub enum PolybotError {
    // -- Matrix processor errors --
    #[error("cannot read image {}: {reason}", path.display())]
    UnreadableImage { path: PathBuf, reason: String },

    /// `filter` names the operation whose size was rejected: `blur` checks
    /// both dimensions, `segment` only the row count.
    #[error("{filter} size {size} does not fit a {height}x{width} matrix")]
    InvalidKernelSize {
        filter: &'static str,
        size: usize,
        height: usize,
        width: usize,
    },

    #[error("matrix width {width} is too small (need at least {required})")]
    DimensionTooSmall { width: usize, required: usize },

    #[error("cannot write image {}: {reason}", path.display())]
    EncodeFailure { path: PathBuf, reason: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    // -- Dispatch errors --
    #[error("no processing method recognised in {0:?}")]
    UnknownFilter(String),

    #[error("photo arrived without a caption")]
    MissingInstruction,

    #[error("a previous image is still being processed")]
    Busy,

    // -- Detection service --
    #[error("detection service timed out: {0}")]
    DetectionTimeout(String),

    #[error("prediction result not found: {0}")]
    DetectionNotFound(String),

    #[error("detection service error: {0}")]
    Detection(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PolybotError>;
