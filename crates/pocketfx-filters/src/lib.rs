// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pocketfx-filters — the image side of pocketfx.
//
// Provides the filter catalog (built-in kernels plus their attribute
// metadata), the adapter that turns that metadata into typed parameter specs,
// the configurator that randomises numeric parameters, the chain evaluator,
// and the session controller that owns an editable chain.

pub mod attributes;
pub mod catalog;
pub mod chain;
pub mod configure;
pub mod error;
pub mod image_io;
pub mod kernels;
pub mod session;

// Re-export the primary types so callers can use `pocketfx_filters::FilterSession` etc.
pub use catalog::{FilterCatalog, FilterDescriptor, ImageFilter};
pub use chain::{Bypassed, FilterInstance, RenderOutcome, evaluate, evaluate_with_report};
pub use configure::{configure, instantiate};
pub use error::ApplyError;
pub use image_io::FloatImage;
pub use session::{ChainSnapshot, FilterSession};
