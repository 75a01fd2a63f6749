//! Self-assessment questions for the current map.

use leptos::prelude::*;

use crate::state::workspace::WorkspaceState;

#[component]
pub fn QuestionList() -> impl IntoView {
    let workspace = expect_context::<RwSignal<WorkspaceState>>();

    view! {
        <Show when=move || workspace.with(|w| !w.questions.is_empty())>
            <section class="question-list">
                <h2 class="question-list__title">"Check your understanding"</h2>
                <ol class="question-list__items">
                    {move || {
                        workspace
                            .with(|w| w.questions.clone())
                            .into_iter()
                            .map(|question| view! { <li class="question-list__item">{question}</li> })
                            .collect_view()
                    }}
                </ol>
            </section>
        </Show>
    }
}
