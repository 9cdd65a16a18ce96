// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filter chain evaluation — fold an ordered list of configured filters over a
// source image.
//
// A filter whose kernel refuses the current image or its parameters is
// bypassed: the image it was given flows on unchanged to the next filter, so
// one bad filter never blanks the whole preview.

use pocketfx_core::types::ParamValues;
use tracing::{debug, instrument, warn};

use crate::catalog::FilterDescriptor;
use crate::error::ApplyError;
use crate::image_io::FloatImage;

/// A descriptor bound to concrete parameter values.
#[derive(Debug, Clone)]
pub struct FilterInstance {
    descriptor: FilterDescriptor,
    values: ParamValues,
}

impl FilterInstance {
    pub fn new(descriptor: FilterDescriptor, values: ParamValues) -> Self {
        Self { descriptor, values }
    }

    /// Instance using every declared default.
    pub fn with_defaults(descriptor: FilterDescriptor) -> Self {
        let values = descriptor.default_values();
        Self { descriptor, values }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &FilterDescriptor {
        &self.descriptor
    }

    pub fn values(&self) -> &ParamValues {
        &self.values
    }

    pub fn apply(&self, image: &FloatImage) -> Result<FloatImage, ApplyError> {
        self.descriptor.apply(image, &self.values)
    }
}

/// A filter that was skipped during evaluation, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct Bypassed {
    pub filter: String,
    pub error: ApplyError,
}

/// Result of one full chain evaluation.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub image: FloatImage,
    /// Names of filters that produced output, in chain order.
    pub applied: Vec<String>,
    /// Filters that refused their input, in chain order.
    pub bypassed: Vec<Bypassed>,
}

/// Apply `chain` to `source` in order.
///
/// Returns `None` when there is no source image. An empty chain returns a
/// copy of the source.
pub fn evaluate(source: Option<&FloatImage>, chain: &[FilterInstance]) -> Option<FloatImage> {
    evaluate_with_report(source, chain).map(|outcome| outcome.image)
}

/// Like [`evaluate`], but also reports which filters ran and which were
/// bypassed.
#[instrument(skip_all, fields(filters = chain.len()))]
pub fn evaluate_with_report(
    source: Option<&FloatImage>,
    chain: &[FilterInstance],
) -> Option<RenderOutcome> {
    let Some(source) = source else {
        debug!("No source image; nothing to render");
        return None;
    };

    let mut current = source.clone();
    let mut applied = Vec::with_capacity(chain.len());
    let mut bypassed = Vec::new();

    for instance in chain {
        match instance.apply(&current) {
            Ok(next) => {
                current = next;
                applied.push(instance.name().to_string());
            }
            Err(error) => {
                warn!(filter = instance.name(), %error, "Filter rejected its input; bypassing");
                bypassed.push(Bypassed {
                    filter: instance.name().to_string(),
                    error,
                });
            }
        }
    }

    debug!(applied = applied.len(), bypassed = bypassed.len(), "Chain evaluated");
    Some(RenderOutcome {
        image: current,
        applied,
        bypassed,
    })
}
