// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filter catalog — named kernels plus the attribute metadata that describes
// their parameters.

use std::fmt;
use std::sync::Arc;

use pocketfx_core::types::{ParamSpec, ParamValues};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::attributes;
use crate::error::ApplyError;
use crate::image_io::FloatImage;
use crate::kernels;

/// A single image transform.
///
/// Kernels never mutate their input. Returning `Err` means "this filter cannot
/// run on this input with these parameters"; callers decide what to do with
/// the refusal.
pub trait ImageFilter: Send + Sync {
    fn apply(&self, image: &FloatImage, params: &ParamValues) -> Result<FloatImage, ApplyError>;
}

impl<F> ImageFilter for F
where
    F: Fn(&FloatImage, &ParamValues) -> Result<FloatImage, ApplyError> + Send + Sync,
{
    fn apply(&self, image: &FloatImage, params: &ParamValues) -> Result<FloatImage, ApplyError> {
        self(image, params)
    }
}

/// Catalog entry with its parameters already classified.
///
/// Cheap to clone: the kernel is shared.
#[derive(Clone)]
pub struct FilterDescriptor {
    name: String,
    display_name: String,
    categories: Vec<String>,
    params: Vec<ParamSpec>,
    kernel: Arc<dyn ImageFilter>,
}

impl FilterDescriptor {
    /// Unique catalog name, e.g. `"GammaAdjust"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Every parameter bound to its declared default.
    pub fn default_values(&self) -> ParamValues {
        self.params
            .iter()
            .map(|p| (p.name.clone(), p.default.clone()))
            .collect()
    }

    /// Run the kernel.
    pub fn apply(&self, image: &FloatImage, params: &ParamValues) -> Result<FloatImage, ApplyError> {
        self.kernel.apply(image, params)
    }
}

impl fmt::Debug for FilterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterDescriptor")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("categories", &self.categories)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

struct CatalogEntry {
    name: String,
    attributes: Value,
    kernel: Arc<dyn ImageFilter>,
}

/// Named filters available to a session, in registration order.
#[derive(Default)]
pub struct FilterCatalog {
    entries: Vec<CatalogEntry>,
}

impl FilterCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding every built-in kernel.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        kernels::register_builtins(&mut catalog);
        catalog
    }

    /// Add a filter, replacing any existing entry with the same name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        attributes: Value,
        kernel: impl ImageFilter + 'static,
    ) {
        let name = name.into();
        let kernel: Arc<dyn ImageFilter> = Arc::new(kernel);
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.attributes = attributes;
                entry.kernel = kernel;
            }
            None => self.entries.push(CatalogEntry {
                name,
                attributes,
                kernel,
            }),
        }
    }

    /// Filter names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a filter by name and classify its parameters.
    ///
    /// Returns `None` for unknown names and for entries whose attribute bag
    /// cannot be read.
    #[instrument(skip(self))]
    pub fn lookup(&self, name: &str) -> Option<FilterDescriptor> {
        let Some(entry) = self.entries.iter().find(|e| e.name == name) else {
            debug!("Filter not in catalog");
            return None;
        };
        let metadata = match attributes::describe(&entry.name, &entry.attributes) {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(error = %err, "Unreadable filter metadata");
                return None;
            }
        };
        Some(FilterDescriptor {
            name: entry.name.clone(),
            display_name: metadata.display_name,
            categories: metadata.categories,
            params: metadata.params,
            kernel: Arc::clone(&entry.kernel),
        })
    }
}
