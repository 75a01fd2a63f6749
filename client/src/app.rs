//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use mapkit::HistoryStore;

use crate::pages::generator::GeneratorPage;
use crate::state::workspace::WorkspaceState;
use crate::util::local_storage::LocalStorage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the workspace and history contexts and sets up routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let workspace = RwSignal::new(WorkspaceState::default());
    let history = RwSignal::new(HistoryStore::new(LocalStorage));

    provide_context(workspace);
    provide_context(history);

    // localStorage only exists in the browser; load after hydration.
    Effect::new(move || history.update(HistoryStore::restore));

    view! {
        <Stylesheet id="leptos" href="/pkg/mapmind.css"/>
        <Title text="MapMind"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=GeneratorPage/>
            </Routes>
        </Router>
    }
}
