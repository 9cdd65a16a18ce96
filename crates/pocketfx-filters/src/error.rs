// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Errors raised by individual filter kernels.

use thiserror::Error;

/// Why a kernel refused to produce an output image.
///
/// The chain evaluator treats every variant the same way: the filter is
/// bypassed and the previous image flows on to the next filter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplyError {
    #[error("parameter {param} is invalid: {reason}")]
    InvalidParameter { param: String, reason: String },

    #[error("parameter {0} is missing")]
    MissingParameter(String),

    #[error("input image is empty")]
    EmptyImage,
}

impl ApplyError {
    pub(crate) fn invalid(param: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.to_string(),
            reason: reason.into(),
        }
    }
}
