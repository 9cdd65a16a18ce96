// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — reactive signals for the Dioxus UI.

use pocketfx_filters::RenderOutcome;

use crate::services::app_services::FilterEntry;

/// Shared state accessible to all components via `use_context`.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Selection list rows, in configured order.
    pub filters: Vec<FilterEntry>,
    /// PNG data URL of the latest accepted render.
    pub preview: Option<String>,
    /// Status message for user feedback.
    pub status: Option<String>,
    /// A background render has been requested and not yet shown.
    pub rendering: bool,
    /// File name of the loaded photo. `None` while showing the placeholder.
    pub image_name: Option<String>,
}

/// One-line summary of a render for the status bar.
pub fn status_line(outcome: &RenderOutcome) -> String {
    let mut line = if outcome.applied.is_empty() {
        "No filters applied".to_string()
    } else {
        format!("Applied: {}", outcome.applied.join(" \u{2192} "))
    };
    if !outcome.bypassed.is_empty() {
        let skipped: Vec<String> = outcome
            .bypassed
            .iter()
            .map(|b| format!("{} ({})", b.filter, b.error))
            .collect();
        line.push_str(&format!(" | Bypassed: {}", skipped.join(", ")));
    }
    line
}
