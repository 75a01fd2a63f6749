//! Networking modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles the single REST call to the generation endpoint. Wire
//! types come from `mapkit` so browser and server agree on the schema.

pub mod api;
