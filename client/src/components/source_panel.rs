//! Input collector: topic text, image upload, depth and style options.
//!
//! SYSTEM CONTEXT
//! ==============
//! Writes straight into the shared `WorkspaceState`. Submitting is delegated
//! to the page through `on_submit` so this panel never talks to the network.

use leptos::prelude::*;
use mapkit::{Depth, DiagramStyle};

use crate::state::workspace::WorkspaceState;

/// Source panel with text input, image picker, options, and submit/reset controls.
#[component]
pub fn SourcePanel(on_submit: Callback<()>) -> impl IntoView {
    let workspace = expect_context::<RwSignal<WorkspaceState>>();
    let file_input_ref = NodeRef::<leptos::html::Input>::new();

    let on_file_change = move |_ev: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            let Some(input) = file_input_ref.get() else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let Some(ticket) = workspace.try_update(WorkspaceState::start_image_read) else {
                return;
            };
            leptos::task::spawn_local(async move {
                let applied = match crate::util::image_upload::read_image(file).await {
                    Ok(image) => workspace.try_update(|w| w.finish_image_read(ticket, image)),
                    Err(message) => workspace.try_update(|w| w.fail_image_read(ticket, message)),
                };
                if applied == Some(false) {
                    log::debug!("image upload: discarded stale read {ticket}");
                }
            });
            // Allow picking the same file again after a reset.
            input.set_value("");
        }
    };

    let on_pick_image = move |_| {
        if let Some(input) = file_input_ref.get() {
            input.click();
        }
    };

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" && (ev.ctrl_key() || ev.meta_key()) {
            ev.prevent_default();
            on_submit.run(());
        }
    };

    let can_submit = move || workspace.with(WorkspaceState::can_submit);
    let analyzing = move || workspace.with(WorkspaceState::is_analyzing);

    view! {
        <section class="source-panel">
            <label class="source-panel__label" for="source-text">"Topic or notes"</label>
            <textarea
                id="source-text"
                class="source-panel__text"
                placeholder="Paste text or describe a topic..."
                rows="8"
                prop:value=move || workspace.with(|w| w.input_text.clone())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    workspace.update(|w| w.input_text = value);
                }
                on:keydown=on_keydown
            ></textarea>

            <div class="source-panel__image">
                <input
                    class="source-panel__file"
                    type="file"
                    accept="image/*"
                    node_ref=file_input_ref
                    on:change=on_file_change
                />
                <button class="btn btn--ghost" on:click=on_pick_image disabled=analyzing>
                    "Add image"
                </button>
                <Show when=move || workspace.with(|w| w.image_loading)>
                    <span class="source-panel__hint">"Reading image..."</span>
                </Show>
                {move || {
                    workspace
                        .with(WorkspaceState::image_preview)
                        .map(|src| {
                            view! {
                                <div class="source-panel__preview">
                                    <img src=src alt="Uploaded image"/>
                                    <button
                                        class="source-panel__remove"
                                        title="Remove image"
                                        on:click=move |_| workspace.update(|w| w.image = None)
                                    >
                                        "×"
                                    </button>
                                </div>
                            }
                        })
                }}
            </div>

            <div class="source-panel__options">
                <div class="source-panel__depth" role="group" aria-label="Depth">
                    {Depth::ALL
                        .into_iter()
                        .map(|depth| {
                            view! {
                                <button
                                    class="toggle"
                                    class:toggle--active=move || workspace.with(|w| w.depth == depth)
                                    on:click=move |_| workspace.update(|w| w.depth = depth)
                                >
                                    {depth.label()}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
                <select
                    class="source-panel__style"
                    aria-label="Map style"
                    on:change=move |ev| {
                        if let Ok(style) = event_target_value(&ev).parse::<DiagramStyle>() {
                            workspace.update(|w| w.style = style);
                        }
                    }
                >
                    {DiagramStyle::ALL
                        .into_iter()
                        .map(|style| {
                            view! {
                                <option
                                    value=style.as_str()
                                    selected=move || workspace.with(|w| w.style == style)
                                >
                                    {style.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <div class="source-panel__actions">
                <button class="btn btn--primary" disabled=move || !can_submit() on:click=move |_| on_submit.run(())>
                    {move || if analyzing() { "Analyzing..." } else { "Generate map" }}
                </button>
                <button
                    class="btn btn--ghost"
                    disabled=analyzing
                    on:click=move |_| workspace.update(WorkspaceState::reset_inputs)
                >
                    "Reset"
                </button>
            </div>
        </section>
    }
}
