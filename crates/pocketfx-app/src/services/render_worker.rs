// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background render worker.
//
// Requests travel over a `watch` channel, which only ever holds the newest
// value: a request that has not started yet is replaced by the next one. A
// single task evaluates at most one request at a time on the blocking pool
// and publishes each result tagged with the generation it was requested for.

use std::sync::Arc;

use pocketfx_filters::{FilterInstance, FloatImage, RenderOutcome, evaluate_with_report};
use tokio::sync::watch;
use tracing::{debug, error, info};

/// One chain/source state to evaluate.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub generation: u64,
    pub source: Arc<FloatImage>,
    pub filters: Arc<[FilterInstance]>,
}

/// A finished evaluation. `outcome` is `Err` with a message when the render
/// task died, so callers can stop waiting for that generation.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub generation: u64,
    pub outcome: Result<Arc<RenderOutcome>, String>,
}

/// Handle to the worker task. Cloning shares the same worker.
#[derive(Clone)]
pub struct RenderWorker {
    requests: Arc<watch::Sender<Option<RenderRequest>>>,
    results: watch::Receiver<Option<RenderResult>>,
}

impl RenderWorker {
    /// Start the worker on the current tokio runtime.
    pub fn spawn() -> Self {
        let (request_tx, mut request_rx) = watch::channel::<Option<RenderRequest>>(None);
        let (result_tx, result_rx) = watch::channel::<Option<RenderResult>>(None);

        tokio::spawn(async move {
            while request_rx.changed().await.is_ok() {
                let Some(request) = request_rx.borrow_and_update().clone() else {
                    continue;
                };
                let generation = request.generation;
                debug!(generation, filters = request.filters.len(), "Render started");

                let evaluated = tokio::task::spawn_blocking(move || {
                    evaluate_with_report(Some(&request.source), &request.filters)
                })
                .await;

                let outcome = match evaluated {
                    Ok(Some(outcome)) => Ok(Arc::new(outcome)),
                    Ok(None) => Err("no source image".to_string()),
                    Err(err) => {
                        error!(generation, error = %err, "Render task failed");
                        Err(format!("render failed: {err}"))
                    }
                };
                if result_tx.send(Some(RenderResult { generation, outcome })).is_err() {
                    break;
                }
            }
            info!("Render worker stopped");
        });

        Self {
            requests: Arc::new(request_tx),
            results: result_rx,
        }
    }

    /// Queue `request`, replacing any request that has not started yet.
    pub fn submit(&self, request: RenderRequest) {
        debug!(generation = request.generation, "Render requested");
        self.requests.send_replace(Some(request));
    }

    /// Subscribe to finished renders.
    pub fn results(&self) -> watch::Receiver<Option<RenderResult>> {
        self.results.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocketfx_filters::FilterCatalog;
    use pocketfx_filters::image_io::sample_source;
    use std::time::Duration;

    fn request(generation: u64, source: &Arc<FloatImage>, names: &[&str]) -> RenderRequest {
        let catalog = FilterCatalog::builtin();
        let filters: Vec<FilterInstance> = names
            .iter()
            .filter_map(|name| catalog.lookup(name))
            .map(FilterInstance::with_defaults)
            .collect();
        RenderRequest {
            generation,
            source: Arc::clone(source),
            filters: Arc::from(filters),
        }
    }

    async fn wait_for(
        results: &mut watch::Receiver<Option<RenderResult>>,
        generation: u64,
    ) -> Vec<u64> {
        let mut seen = Vec::new();
        loop {
            results.changed().await.unwrap();
            let Some(result) = results.borrow_and_update().clone() else {
                continue;
            };
            seen.push(result.generation);
            if result.generation == generation {
                return seen;
            }
        }
    }

    #[tokio::test]
    async fn delivers_the_requested_render() {
        let worker = RenderWorker::spawn();
        let mut results = worker.results();
        let source = Arc::new(sample_source(32, 32));

        worker.submit(request(1, &source, &["ColorInvert"]));
        tokio::time::timeout(Duration::from_secs(10), wait_for(&mut results, 1))
            .await
            .unwrap();

        let latest = results.borrow().clone().unwrap();
        assert_eq!(latest.outcome.unwrap().applied, vec!["ColorInvert"]);
    }

    #[tokio::test]
    async fn panicking_kernel_still_reports_a_result() {
        let mut catalog = FilterCatalog::new();
        catalog.register(
            "Explodes",
            serde_json::json!({}),
            |_: &FloatImage, _: &pocketfx_core::types::ParamValues| -> Result<FloatImage, pocketfx_filters::ApplyError> {
                panic!("kernel bug")
            },
        );
        let filters: Vec<FilterInstance> = catalog
            .lookup("Explodes")
            .map(FilterInstance::with_defaults)
            .into_iter()
            .collect();

        let worker = RenderWorker::spawn();
        let mut results = worker.results();
        worker.submit(RenderRequest {
            generation: 4,
            source: Arc::new(sample_source(4, 4)),
            filters: Arc::from(filters),
        });
        tokio::time::timeout(Duration::from_secs(10), wait_for(&mut results, 4))
            .await
            .unwrap();

        let latest = results.borrow().clone().unwrap();
        assert!(latest.outcome.is_err());
    }

    #[tokio::test]
    async fn latest_request_wins() {
        let worker = RenderWorker::spawn();
        let mut results = worker.results();
        let source = Arc::new(sample_source(256, 256));

        for generation in 1..=20 {
            worker.submit(request(generation, &source, &["GaussianBlur", "Vignette"]));
        }
        let seen = tokio::time::timeout(Duration::from_secs(30), wait_for(&mut results, 20))
            .await
            .unwrap();

        // Superseded requests are skipped, never delivered after a newer one.
        assert!(seen.windows(2).all(|w| w[0] < w[1]), "out of order: {seen:?}");
        assert!(seen.len() < 20, "every request was rendered: {seen:?}");
        assert_eq!(*seen.last().unwrap(), 20);
    }
}
