//! # client
//!
//! Leptos + WASM frontend for MapMind.
//!
//! This crate contains the generator page, its components, the workspace
//! state, and the browser adapters (`localStorage` history, image upload,
//! clipboard). Shared types and the Kroki encoder come from `mapkit`.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered page.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("console_log init failed: {e}").into());
    }
    leptos::mount::hydrate_body(app::App);
}
