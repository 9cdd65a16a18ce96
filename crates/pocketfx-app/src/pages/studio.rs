// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Studio page — filter selection list beside the rendered preview.

use std::sync::Arc;

use dioxus::prelude::*;

use pocketfx_filters::RenderOutcome;

use crate::services::app_services::{AppServices, FilterEntry};
use crate::services::preview;
use crate::services::render_worker::RenderWorker;
use crate::state::{AppState, status_line};

#[component]
pub fn Studio() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let worker = use_context::<Option<RenderWorker>>();

    // First render of the startup image.
    {
        let svc = svc.clone();
        let worker = worker.clone();
        use_hook(move || refresh(&svc, worker.as_ref(), state));
    }

    // Show worker results that still match the session.
    {
        let svc = svc.clone();
        let worker = worker.clone();
        use_future(move || {
            let svc = svc.clone();
            let worker = worker.clone();
            async move {
                let Some(worker) = worker else {
                    return;
                };
                let mut results = worker.results();
                while results.changed().await.is_ok() {
                    let Some(result) = results.borrow_and_update().clone() else {
                        continue;
                    };
                    match result.outcome {
                        Ok(outcome) => {
                            if svc.accept_render(result.generation, Arc::clone(&outcome)) {
                                show(&outcome, state);
                            }
                        }
                        Err(message) => {
                            if svc.is_current(result.generation) {
                                let mut state = state.write();
                                state.status = Some(message);
                                state.rendering = false;
                            }
                        }
                    }
                }
            }
        });
    }

    let entries = state.read().filters.clone();
    let preview_url = state.read().preview.clone();
    let status = state.read().status.clone();
    let rendering = state.read().rendering;
    let image_name = state
        .read()
        .image_name
        .clone()
        .unwrap_or_else(|| "sample gradient".into());

    rsx! {
        div { style: "display: flex; gap: 16px; height: 100%;",

            // Filter list
            div { style: "width: 240px; display: flex; flex-direction: column; gap: 4px;",
                h2 { style: "margin: 0 0 8px 0;", "Filters" }
                for entry in entries {
                    {
                        let name = entry.name.clone();
                        let key = entry.name.clone();
                        let svc = svc.clone();
                        let worker = worker.clone();
                        rsx! {
                            FilterRow {
                                key: "{key}",
                                entry: entry,
                                onclick: move |_| {
                                    svc.toggle_filter(&name);
                                    refresh(&svc, worker.as_ref(), state);
                                },
                            }
                        }
                    }
                }

                button {
                    style: "margin-top: 12px; padding: 8px; border-radius: 6px; border: 1px solid #ccc; background: white;",
                    onclick: {
                        let svc = svc.clone();
                        let worker = worker.clone();
                        move |_| {
                            svc.clear_filters();
                            refresh(&svc, worker.as_ref(), state);
                        }
                    },
                    "Clear"
                }
                button {
                    style: "padding: 8px; border-radius: 6px; border: 1px solid #007aff; color: #007aff; background: white;",
                    onclick: {
                        let svc = svc.clone();
                        let worker = worker.clone();
                        move |_| {
                            #[cfg(not(any(target_os = "ios", target_os = "android")))]
                            {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("Images", &["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"])
                                    .pick_file()
                                {
                                    match svc.load_image(&path) {
                                        Ok(_) => {
                                            let name = path
                                                .file_name()
                                                .map(|n| n.to_string_lossy().to_string())
                                                .unwrap_or_else(|| "image".into());
                                            tracing::info!(file = %name, "image opened");
                                            state.write().image_name = Some(name);
                                            refresh(&svc, worker.as_ref(), state);
                                        }
                                        Err(e) => state.write().status = Some(format!("Could not open image: {e}")),
                                    }
                                }
                            }
                            #[cfg(any(target_os = "ios", target_os = "android"))]
                            {
                                let _ = (&svc, &worker);
                                state.write().status = Some("File picker not available on mobile".into());
                            }
                        }
                    },
                    "Open image\u{2026}"
                }
                button {
                    style: "padding: 8px; border-radius: 6px; border: none; background: #34c759; color: white;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            #[cfg(not(any(target_os = "ios", target_os = "android")))]
                            {
                                if let Some(path) = rfd::FileDialog::new()
                                    .set_file_name("pocketfx.png")
                                    .add_filter("PNG", &["png"])
                                    .save_file()
                                {
                                    let message = match svc.save_rendered(&path) {
                                        Ok(()) => format!("Saved {}", path.display()),
                                        Err(e) => format!("Save failed: {e}"),
                                    };
                                    state.write().status = Some(message);
                                }
                            }
                            #[cfg(any(target_os = "ios", target_os = "android"))]
                            {
                                let _ = &svc;
                                state.write().status = Some("Saving not available on mobile".into());
                            }
                        }
                    },
                    "Save result\u{2026}"
                }
            }

            // Preview
            div { style: "flex: 1; display: flex; flex-direction: column; min-width: 0;",
                div { style: "flex: 1; display: flex; align-items: center; justify-content: center; background: #1e1e1e; border-radius: 8px; overflow: hidden;",
                    if let Some(url) = preview_url {
                        img { src: "{url}", style: "max-width: 100%; max-height: 100%; object-fit: contain;" }
                    } else {
                        p { style: "color: #888;", "No image" }
                    }
                }
                p { style: "color: #666; font-size: 13px; margin: 8px 0 0 0;",
                    "{image_name}"
                    if rendering { " \u{00B7} rendering\u{2026}" }
                }
                if let Some(msg) = status {
                    p { style: "font-size: 13px; margin: 4px 0 0 0;", "{msg}" }
                }
            }
        }
    }
}

#[component]
fn FilterRow(entry: FilterEntry, onclick: EventHandler<MouseEvent>) -> Element {
    let mark = if entry.applied { "\u{2713}" } else { "" };
    let weight = if entry.applied { "600" } else { "400" };
    let randomised = if entry.randomised.is_empty() {
        "no parameters".to_string()
    } else {
        entry.randomised.join(", ")
    };
    let tooltip = entry.categories.join(", ");
    rsx! {
        div {
            style: "display: flex; align-items: center; padding: 8px; border-radius: 6px; cursor: pointer; background: #f4f4f4; font-weight: {weight};",
            title: "{tooltip}",
            onclick: move |evt| onclick.call(evt),
            span { style: "width: 20px; color: #007aff;", "{mark}" }
            div { style: "display: flex; flex-direction: column;",
                span { "{entry.display_name}" }
                span { style: "font-size: 11px; font-weight: 400; color: #888;", "{randomised}" }
            }
        }
    }
}

/// Rebuild the filter list and render the current chain, on `worker` when
/// background rendering is enabled.
fn refresh(svc: &AppServices, worker: Option<&RenderWorker>, mut state: Signal<AppState>) {
    state.write().filters = svc.filter_entries();
    match worker {
        Some(worker) => {
            let requested = svc.request_render(worker);
            if let Some(generation) = requested {
                tracing::debug!(generation, "background render requested");
            }
            state.write().rendering = requested.is_some();
        }
        None => match svc.render_now() {
            Some(outcome) => show(&outcome, state),
            None => state.write().preview = None,
        },
    }
}

fn show(outcome: &RenderOutcome, mut state: Signal<AppState>) {
    let preview = match preview::data_url(&outcome.image) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::error!(error = %e, "preview encoding failed");
            None
        }
    };
    let mut state = state.write();
    state.preview = preview;
    state.status = Some(status_line(outcome));
    state.rendering = false;
}
