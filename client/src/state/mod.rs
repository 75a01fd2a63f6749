//! Reactive client state shared through Leptos context.

pub mod workspace;
