//! History sidebar: past maps, newest first.
//!
//! SYSTEM CONTEXT
//! ==============
//! Selecting an entry loads it into the workspace without touching the
//! history list. "Clear all" empties the list and the persisted key.

use leptos::prelude::*;
use mapkit::HistoryStore;

use crate::state::workspace::WorkspaceState;
use crate::util::local_storage::LocalStorage;

/// Longest input summary shown before truncating with an ellipsis.
const SUMMARY_CHARS: usize = 60;

pub(crate) fn short_summary(summary: &str) -> String {
    let mut chars = summary.chars();
    let head: String = chars.by_ref().take(SUMMARY_CHARS).collect();
    if chars.next().is_some() { format!("{head}…") } else { head }
}

#[component]
pub fn HistorySidebar() -> impl IntoView {
    let workspace = expect_context::<RwSignal<WorkspaceState>>();
    let history = expect_context::<RwSignal<HistoryStore<LocalStorage>>>();

    let on_select = move |id: String| {
        let entry = history.with_untracked(|h| h.get(&id).cloned());
        if let Some(entry) = entry {
            workspace.update(|w| w.restore(&entry));
        }
    };

    let on_clear = move |_| {
        history.update(|h| {
            if let Err(e) = h.clear() {
                #[cfg(feature = "hydrate")]
                log::warn!("history: clear failed: {e}");
                #[cfg(not(feature = "hydrate"))]
                drop(e);
            }
        });
    };

    view! {
        <aside class="history-sidebar">
            <header class="history-sidebar__header">
                <h2>"History"</h2>
                <Show when=move || history.with(|h| !h.is_empty())>
                    <button class="btn btn--link" on:click=on_clear>"Clear all"</button>
                </Show>
            </header>
            <Show
                when=move || history.with(|h| !h.is_empty())
                fallback=|| view! { <p class="history-sidebar__empty">"No maps yet"</p> }
            >
                <ul class="history-sidebar__list">
                    {move || {
                        history
                            .with(|h| h.entries().to_vec())
                            .into_iter()
                            .map(|entry| {
                                let id = entry.id.clone();
                                let date = crate::util::clock::local_label(entry.created_at).unwrap_or_else(|| entry.created_label());
                                view! {
                                    <li>
                                        <button class="history-sidebar__item" on:click=move |_| on_select(id.clone())>
                                            <span class="history-sidebar__summary">{short_summary(&entry.input_summary)}</span>
                                            <span class="history-sidebar__date">{date}</span>
                                        </button>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </Show>
        </aside>
    }
}

#[cfg(test)]
#[path = "history_sidebar_test.rs"]
mod history_sidebar_test;
