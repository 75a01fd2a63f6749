//! Generator page: input on the left, map and questions in the middle,
//! history on the right.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns the one network interaction. A submit moves the workspace into
//! `Analyzing`, calls `/api/generate`, then either applies the result and
//! records a history entry, or flags a generic error while leaving the
//! previous map and history untouched.

use leptos::prelude::*;

use crate::components::diagram_preview::DiagramPreview;
use crate::components::history_sidebar::HistorySidebar;
use crate::components::question_list::QuestionList;
use crate::components::source_panel::SourcePanel;
use crate::state::workspace::WorkspaceState;

#[component]
pub fn GeneratorPage() -> impl IntoView {
    let workspace = expect_context::<RwSignal<WorkspaceState>>();
    #[cfg(feature = "hydrate")]
    let history = expect_context::<RwSignal<mapkit::HistoryStore<crate::util::local_storage::LocalStorage>>>();

    let on_submit = Callback::new(move |()| {
        let Some(request) = workspace.try_update(WorkspaceState::begin_generation).flatten() else {
            return;
        };
        #[cfg(feature = "hydrate")]
        {
            leptos::task::spawn_local(async move {
                match crate::net::api::generate(&request).await {
                    Ok(result) => {
                        let entry = mapkit::HistoryEntry::from_generation(
                            &request,
                            &result,
                            crate::util::clock::now_millis(),
                        );
                        history.update(|h| {
                            if let Err(e) = h.record(entry) {
                                log::warn!("history: persist failed: {e}");
                            }
                        });
                        workspace.update(|w| w.apply_result(result));
                    }
                    Err(e) => {
                        log::warn!("generation failed: {e}");
                        workspace.update(WorkspaceState::apply_failure);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            drop(request);
        }
    });

    view! {
        <div class="generator">
            <header class="generator__header">
                <h1>"MapMind"</h1>
                <p class="generator__tagline">"Turn notes and images into concept maps."</p>
            </header>
            {move || {
                workspace
                    .with(|w| w.error.clone())
                    .map(|message| {
                        view! {
                            <div class="generator__error" role="alert">
                                <span>{message}</span>
                                <button
                                    class="btn btn--link"
                                    on:click=move |_| workspace.update(WorkspaceState::dismiss_error)
                                >
                                    "Dismiss"
                                </button>
                            </div>
                        }
                    })
            }}
            <main class="generator__body">
                <SourcePanel on_submit/>
                <div class="generator__output">
                    <DiagramPreview/>
                    <QuestionList/>
                </div>
                <HistorySidebar/>
            </main>
        </div>
    }
}
