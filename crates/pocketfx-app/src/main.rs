// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pocketfx — toggle randomised image filters over a photo.
//
// Entry point. Initialises logging, the filter session and optional render
// worker, and launches the Dioxus UI.

mod pages;
mod services;
mod state;

use dioxus::prelude::*;

use pages::studio::Studio;
use services::app_services::AppServices;
use services::render_worker::RenderWorker;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("pocketfx starting");

    dioxus::launch(app);
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(AppServices::init);
    let worker = use_hook(|| {
        let background = svc.background_render();
        tracing::info!(background, "render mode selected");
        background.then(RenderWorker::spawn)
    });

    use_context_provider(|| svc.clone());
    use_context_provider(|| worker.clone());
    use_context_provider(|| Signal::new(state::AppState::default()));

    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; padding: 16px; box-sizing: border-box; font-family: system-ui, -apple-system, sans-serif;",
            Studio {}
        }
    }
}
