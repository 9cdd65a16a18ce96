// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the filter session and configuration and
// exposes the operations the Dioxus UI calls.
//
// `FilterSession` is mutated from UI event handlers and read from the render
// result task, so it lives behind `Arc<Mutex<>>`. Critical sections are short:
// evaluation itself happens outside the lock.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pocketfx_core::{AppConfig, PocketError};
use pocketfx_core::error::Result;
use pocketfx_filters::image_io::{load_source, sample_source, save_rendered};
use pocketfx_filters::{ChainSnapshot, FilterCatalog, FilterSession, RenderOutcome};
use tracing::{info, warn};

use super::data_dir;
use super::render_worker::{RenderRequest, RenderWorker};

const CONFIG_FILE: &str = "config.json";
const PLACEHOLDER_SIZE: (u32, u32) = (640, 480);

/// One row of the filter selection list.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEntry {
    pub name: String,
    pub display_name: String,
    pub categories: Vec<String>,
    /// Labels of the parameters that get randomised on add.
    pub randomised: Vec<String>,
    pub applied: bool,
}

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
#[derive(Clone)]
pub struct AppServices {
    session: Arc<Mutex<FilterSession>>,
    config: Arc<Mutex<AppConfig>>,
    data_dir: PathBuf,
}

impl AppServices {
    /// Load the persisted config from the platform data directory and start
    /// a session on the configured (or placeholder) source image.
    pub fn init() -> Self {
        let dir = data_dir::data_dir();
        info!(path = %dir.display(), "initialising app services");
        let Some(config) = load_config(&dir) else {
            // First run: write the defaults so there is a file to edit.
            let svc = Self::with_config(dir, AppConfig::default());
            if let Err(e) = svc.save_config(&svc.config()) {
                warn!(error = %e, "could not write default config");
            }
            return svc;
        };
        Self::with_config(dir, config)
    }

    /// Build services around an explicit config. Nothing is read from disk
    /// except `config.default_image`.
    pub fn with_config(data_dir: PathBuf, config: AppConfig) -> Self {
        let catalog = Arc::new(FilterCatalog::builtin());
        let mut session = FilterSession::new(catalog, config.random_seed);

        let source = config
            .default_image
            .as_ref()
            .and_then(|path| match load_source(path, config.preview_max_dimension) {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "default image unavailable; using placeholder");
                    None
                }
            })
            .unwrap_or_else(|| sample_source(PLACEHOLDER_SIZE.0, PLACEHOLDER_SIZE.1));
        session.set_source(source);

        Self {
            session: Arc::new(Mutex::new(session)),
            config: Arc::new(Mutex::new(config)),
            data_dir,
        }
    }

    fn session(&self) -> MutexGuard<'_, FilterSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -- Filter list ------------------------------------------------------------

    /// Configured filters that the catalog knows, with their applied state.
    pub fn filter_entries(&self) -> Vec<FilterEntry> {
        let names = self.config().available_filters;
        let session = self.session();
        names
            .into_iter()
            .filter_map(|name| {
                let Some(descriptor) = session.catalog().lookup(&name) else {
                    warn!(filter = %name, "configured filter is not in the catalog");
                    return None;
                };
                Some(FilterEntry {
                    applied: session.is_applied(&name),
                    display_name: descriptor.display_name().to_string(),
                    categories: descriptor.categories().to_vec(),
                    randomised: descriptor
                        .params()
                        .iter()
                        .filter(|p| p.kind.is_numeric())
                        .map(|p| p.display_name.clone())
                        .collect(),
                    name,
                })
            })
            .collect()
    }

    pub fn toggle_filter(&self, name: &str) -> ChainSnapshot {
        self.session().toggle(name)
    }

    pub fn clear_filters(&self) -> ChainSnapshot {
        self.session().clear()
    }

    // -- Source / output --------------------------------------------------------

    /// Replace the source image with the photo at `path`.
    pub fn load_image(&self, path: &Path) -> Result<ChainSnapshot> {
        let max_dimension = self.config().preview_max_dimension;
        let image = load_source(path, max_dimension)?;
        Ok(self.session().set_source(image))
    }

    /// Write the current render to `path`, evaluating first if the last
    /// render is out of date.
    pub fn save_rendered(&self, path: &Path) -> Result<()> {
        let image = self
            .session()
            .render()
            .map(|outcome| outcome.image.clone())
            .ok_or(PocketError::NoSourceImage)?;
        save_rendered(&image, path)?;
        info!(path = %path.display(), "rendered image saved");
        Ok(())
    }

    // -- Rendering --------------------------------------------------------------

    pub fn background_render(&self) -> bool {
        self.config().background_render
    }

    /// Evaluate on the calling thread.
    pub fn render_now(&self) -> Option<RenderOutcome> {
        self.session().render().cloned()
    }

    /// Hand the current state to `worker`. Returns the generation requested,
    /// or `None` when there is no source image.
    pub fn request_render(&self, worker: &RenderWorker) -> Option<u64> {
        let (snapshot, source) = {
            let session = self.session();
            (session.snapshot(), session.source().cloned())
        };
        let source = source?;
        worker.submit(RenderRequest {
            generation: snapshot.generation,
            source,
            filters: snapshot.filters,
        });
        Some(snapshot.generation)
    }

    /// Store a worker result. `false` when the session has moved on.
    pub fn accept_render(&self, generation: u64, outcome: Arc<RenderOutcome>) -> bool {
        self.session()
            .accept_render(generation, Arc::unwrap_or_clone(outcome))
    }

    /// Whether `generation` is the session's current state.
    pub fn is_current(&self, generation: u64) -> bool {
        self.session().generation() == generation
    }

    // -- Config -----------------------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Update and persist the config.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = config.clone();
        persist_config(&self.data_dir, config)
    }
}

fn load_config(data_dir: &Path) -> Option<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config");
            None
        }
    }
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}
