// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for pocketfx.

use thiserror::Error;

/// Top-level error type for all pocketfx operations.
#[derive(Debug, Error)]
pub enum PocketError {
    // -- Image errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("no source image loaded")]
    NoSourceImage,

    // -- Catalog errors --
    #[error("invalid metadata for filter {filter}: {detail}")]
    InvalidMetadata { filter: String, detail: String },

    // -- Configuration / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PocketError>;
