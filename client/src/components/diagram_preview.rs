//! Diagram preview and export controls.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendering is delegated to Kroki: the Mermaid source is encoded into the
//! image URL and the browser fetches the SVG directly. An empty diagram
//! yields no links, so the preview is suppressed rather than pointing at a
//! broken image.

use leptos::prelude::*;
use mapkit::{DiagramRenderer, KrokiRenderer, OutputFormat, RenderLinks};

use crate::state::workspace::{GenerationStatus, WorkspaceState};
use crate::util::clipboard;

#[cfg(feature = "hydrate")]
const COPIED_RESET_MS: u32 = 2000;

/// Preview of the current diagram with open/download/copy actions.
#[component]
pub fn DiagramPreview() -> impl IntoView {
    let workspace = expect_context::<RwSignal<WorkspaceState>>();
    let renderer = KrokiRenderer::default();
    let copied = RwSignal::new(false);

    let links = Memo::new(move |_| workspace.with(|w| renderer.render_links(&w.diagram_code)));

    let on_copy = move |_| {
        let code = workspace.with_untracked(|w| w.diagram_code.clone());
        if clipboard::copy_text(&code) {
            copied.set(true);
            #[cfg(feature = "hydrate")]
            {
                gloo_timers::callback::Timeout::new(COPIED_RESET_MS, move || copied.set(false)).forget();
            }
        }
    };

    let download = move |format: OutputFormat| {
        if let Some(links) = links.get_untracked() {
            clipboard::download(links.get(format), format);
        }
    };

    view! {
        <section class="diagram-preview">
            {move || match links.get() {
                None => {
                    let analyzing = workspace.with(|w| w.status == GenerationStatus::Analyzing);
                    view! {
                        <div class="diagram-preview__empty">
                            {if analyzing { "Building your concept map..." } else { "Your concept map will appear here." }}
                        </div>
                    }
                    .into_any()
                }
                Some(RenderLinks { svg, .. }) => view! {
                    <div class="diagram-preview__frame">
                        <img class="diagram-preview__image" src=svg.clone() alt="Concept map"/>
                    </div>
                    <div class="diagram-preview__actions">
                        <a class="btn btn--ghost" href=svg target="_blank" rel="noopener noreferrer">"Open SVG"</a>
                        <button class="btn btn--ghost" on:click=move |_| download(OutputFormat::Png)>"Download PNG"</button>
                        <button class="btn btn--ghost" on:click=move |_| download(OutputFormat::Jpeg)>"Download JPEG"</button>
                        <button class="btn btn--ghost" on:click=on_copy>
                            {move || if copied.get() { "Copied" } else { "Copy code" }}
                        </button>
                    </div>
                    <figure class="diagram-preview__source">
                        <figcaption class="diagram-preview__source-title">"Mermaid source"</figcaption>
                        <pre class="diagram-preview__code">{move || workspace.with(|w| w.diagram_code.clone())}</pre>
                    </figure>
                }
                .into_any(),
            }}
            <Show when=move || workspace.with(|w| w.explanation.is_some())>
                <p class="diagram-preview__explanation">
                    {move || workspace.with(|w| w.explanation.clone().unwrap_or_default())}
                </p>
            </Show>
        </section>
    }
}
