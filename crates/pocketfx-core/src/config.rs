// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Filters offered in the selection list when no config file exists.
pub const DEFAULT_FILTERS: [&str; 4] = ["ColorInvert", "ColorControls", "GammaAdjust", "HueAdjust"];

/// Persistent application settings.
///
/// Every field has a default, so a config file written by an older build
/// (or edited by hand with only a few keys) still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Filter names shown in the selection list, in display order.
    pub available_filters: Vec<String>,
    /// Fixed seed for parameter randomisation. `None` seeds from the OS.
    pub random_seed: Option<u64>,
    /// Source images are downscaled to fit this many pixels on the longest side.
    /// `0` disables downscaling.
    pub preview_max_dimension: u32,
    /// Evaluate the filter chain off the UI thread.
    pub background_render: bool,
    /// Photo loaded at startup. A generated gradient is used when unset.
    pub default_image: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            available_filters: DEFAULT_FILTERS.iter().map(|name| name.to_string()).collect(),
            random_seed: None,
            preview_max_dimension: 1024,
            background_render: true,
            default_image: None,
        }
    }
}
