// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Tankobon.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Tankobon operations.
#[derive(Debug, Error)]
pub enum TankobonError {
    // -- Input errors --
    #[error("cannot read input {}: {reason}", path.display())]
    UnreadableInput { path: PathBuf, reason: String },

    #[error("unexpected raster shape in {}: {detail}", path.display())]
    UnexpectedRasterShape { path: PathBuf, detail: String },

    // -- Output errors --
    #[error("cannot write output {}: {reason}", path.display())]
    OutputWriteFailure { path: PathBuf, reason: String },

    /// Failure inside a volume job, with the page counter at the time it
    /// happened.
    #[error("volume {volume:02} failed at page {page:03}: {source}")]
    Volume {
        volume: u32,
        page: u32,
        #[source]
        source: Box<TankobonError>,
    },

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TankobonError {
    /// Wrap `self` with the volume context of a running job.
    ///
    /// Errors that already carry a volume context are returned unchanged.
    pub fn in_volume(self, volume: u32, page: u32) -> Self {
        match self {
            err @ TankobonError::Volume { .. } => err,
            other => TankobonError::Volume {
                volume,
                page,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, with any volume context peeled off.
    pub fn root(&self) -> &TankobonError {
        match self {
            TankobonError::Volume { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TankobonError>;
