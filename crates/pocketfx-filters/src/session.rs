// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filter session — the single owner of an editable filter chain.
//
// A filter is either absent from the chain or applied to it. Adding a filter
// looks it up in the catalog and randomises its parameters once; removing it
// drops that instance. Every change bumps a generation counter so renders
// started from an older state can be recognised and discarded.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::catalog::FilterCatalog;
use crate::chain::{FilterInstance, RenderOutcome, evaluate_with_report};
use crate::configure::instantiate;
use crate::image_io::FloatImage;

/// Immutable view of the chain at one generation.
#[derive(Debug, Clone)]
pub struct ChainSnapshot {
    pub generation: u64,
    pub filters: Arc<[FilterInstance]>,
}

impl ChainSnapshot {
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.iter().any(|f| f.name() == name)
    }

    /// Filter names in application order.
    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(FilterInstance::name).collect()
    }
}

/// Owns the chain, the source image and the random source used to configure
/// new filters.
pub struct FilterSession {
    catalog: Arc<FilterCatalog>,
    chain: Vec<FilterInstance>,
    source: Option<Arc<FloatImage>>,
    rng: StdRng,
    generation: u64,
    rendered: Option<(u64, RenderOutcome)>,
}

impl FilterSession {
    /// Start an empty session. A `seed` makes parameter randomisation
    /// reproducible.
    pub fn new(catalog: Arc<FilterCatalog>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            catalog,
            chain: Vec::new(),
            source: None,
            rng,
            generation: 0,
            rendered: None,
        }
    }

    pub fn catalog(&self) -> &Arc<FilterCatalog> {
        &self.catalog
    }

    // -- Chain membership -----------------------------------------------------

    /// Append `name` with freshly randomised parameters.
    ///
    /// Unknown names and filters already in the chain leave it unchanged.
    pub fn add(&mut self, name: &str) -> ChainSnapshot {
        if self.is_applied(name) {
            debug!(filter = name, "Filter already applied");
            return self.snapshot();
        }
        let Some(descriptor) = self.catalog.lookup(name) else {
            debug!(filter = name, "Unknown filter ignored");
            return self.snapshot();
        };

        let instance = instantiate(descriptor, &mut self.rng);
        info!(filter = name, params = instance.values().len(), "Filter added");
        self.chain.push(instance);
        self.bump()
    }

    /// Remove `name` from the chain. Parameters are not kept: adding the
    /// filter again randomises it afresh.
    pub fn remove(&mut self, name: &str) -> ChainSnapshot {
        let Some(index) = self.chain.iter().position(|f| f.name() == name) else {
            return self.snapshot();
        };
        self.chain.remove(index);
        info!(filter = name, "Filter removed");
        self.bump()
    }

    /// Add `name` if absent, remove it if applied.
    pub fn toggle(&mut self, name: &str) -> ChainSnapshot {
        if self.is_applied(name) {
            self.remove(name)
        } else {
            self.add(name)
        }
    }

    /// Remove every filter.
    pub fn clear(&mut self) -> ChainSnapshot {
        if self.chain.is_empty() {
            return self.snapshot();
        }
        info!(removed = self.chain.len(), "Filter chain cleared");
        self.chain.clear();
        self.bump()
    }

    pub fn is_applied(&self, name: &str) -> bool {
        self.chain.iter().any(|f| f.name() == name)
    }

    pub fn chain(&self) -> &[FilterInstance] {
        &self.chain
    }

    // -- Source image ---------------------------------------------------------

    pub fn set_source(&mut self, image: FloatImage) -> ChainSnapshot {
        info!(width = image.width(), height = image.height(), "Source image set");
        self.source = Some(Arc::new(image));
        self.bump()
    }

    pub fn source(&self) -> Option<&Arc<FloatImage>> {
        self.source.as_ref()
    }

    // -- Rendering ------------------------------------------------------------

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            generation: self.generation,
            filters: Arc::from(self.chain.clone()),
        }
    }

    /// Evaluate the current chain unless the last render is still current.
    pub fn render(&mut self) -> Option<&RenderOutcome> {
        let stale = self
            .rendered
            .as_ref()
            .is_none_or(|(generation, _)| *generation != self.generation);
        if stale {
            self.rendered = evaluate_with_report(self.source.as_deref(), &self.chain)
                .map(|outcome| (self.generation, outcome));
        }
        self.rendered.as_ref().map(|(_, outcome)| outcome)
    }

    /// Store a render computed elsewhere. Returns `false`, and drops the
    /// outcome, when `generation` is not the session's current generation.
    pub fn accept_render(&mut self, generation: u64, outcome: RenderOutcome) -> bool {
        if generation != self.generation {
            debug!(generation, current = self.generation, "Discarding stale render");
            return false;
        }
        self.rendered = Some((generation, outcome));
        true
    }

    /// Last accepted render, if it matches the current generation.
    pub fn rendered(&self) -> Option<&RenderOutcome> {
        self.rendered
            .as_ref()
            .filter(|(generation, _)| *generation == self.generation)
            .map(|(_, outcome)| outcome)
    }

    fn bump(&mut self) -> ChainSnapshot {
        self.generation += 1;
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::evaluate;
    use crate::image_io::sample_source;

    fn session() -> FilterSession {
        FilterSession::new(Arc::new(FilterCatalog::builtin()), Some(7))
    }

    #[test]
    fn add_appends_in_order_and_bumps_generation() {
        let mut session = session();
        let first = session.add("GammaAdjust");
        let second = session.add("ColorInvert");
        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
        assert_eq!(second.names(), vec!["GammaAdjust", "ColorInvert"]);
    }

    #[test]
    fn unknown_or_duplicate_add_is_a_no_op() {
        let mut session = session();
        session.add("HueAdjust");
        let unknown = session.add("NotAFilter");
        let duplicate = session.add("HueAdjust");
        assert_eq!(unknown.generation, 1);
        assert_eq!(duplicate.generation, 1);
        assert_eq!(duplicate.len(), 1);
    }

    #[test]
    fn added_filter_is_configured_within_range() {
        let mut session = session();
        let snapshot = session.add("GammaAdjust");
        let power = snapshot.filters[0].values().float("power").unwrap();
        assert!((0.25..=4.0).contains(&power));
    }

    #[test]
    fn toggle_removes_then_re_adds() {
        let mut session = session();
        assert!(session.toggle("ColorControls").contains("ColorControls"));
        assert!(!session.toggle("ColorControls").contains("ColorControls"));
        assert!(session.toggle("ColorControls").contains("ColorControls"));
        assert_eq!(session.generation(), 3);
    }

    #[test]
    fn remove_absent_filter_keeps_generation() {
        let mut session = session();
        session.add("Sepia");
        assert_eq!(session.remove("Vignette").generation, 1);
        assert_eq!(session.remove("Sepia").generation, 2);
        assert!(session.chain().is_empty());
    }

    #[test]
    fn clear_empties_the_chain() {
        let mut session = session();
        session.add("Sepia");
        session.add("Posterize");
        let cleared = session.clear();
        assert!(cleared.is_empty());
        assert_eq!(cleared.generation, 3);
        assert_eq!(session.clear().generation, 3);
    }

    #[test]
    fn snapshots_are_unaffected_by_later_changes() {
        let mut session = session();
        let before = session.add("ColorInvert");
        session.clear();
        assert_eq!(before.names(), vec!["ColorInvert"]);
    }

    #[test]
    fn render_without_source_is_none() {
        let mut session = session();
        session.add("ColorInvert");
        assert!(session.render().is_none());
    }

    #[test]
    fn render_reflects_the_full_current_chain() {
        let mut session = session();
        session.set_source(sample_source(16, 16));
        session.add("ColorInvert");
        session.add("GammaAdjust");

        let expected = evaluate(session.source().map(|s| s.as_ref()), session.chain()).unwrap();
        assert_eq!(session.render().unwrap().image, expected);

        session.remove("ColorInvert");
        let expected = evaluate(session.source().map(|s| s.as_ref()), session.chain()).unwrap();
        assert_eq!(session.render().unwrap().image, expected);
    }

    #[test]
    fn stale_renders_are_rejected() {
        let mut session = session();
        session.set_source(sample_source(4, 4));
        let old = session.snapshot();
        let outcome = evaluate_with_report(session.source().map(|s| s.as_ref()), &old.filters).unwrap();
        session.add("Sepia");

        assert!(!session.accept_render(old.generation, outcome.clone()));
        assert!(session.rendered().is_none());
        assert!(session.accept_render(session.generation(), outcome));
        assert!(session.rendered().is_some());
    }

    #[test]
    fn same_seed_same_configuration() {
        let mut a = session();
        let mut b = session();
        let sa = a.add("ColorControls");
        let sb = b.add("ColorControls");
        assert_eq!(sa.filters[0].values(), sb.filters[0].values());
    }
}
