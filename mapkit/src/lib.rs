//! Shared concept-map model, Kroki encoder, and generation history.
//!
//! This crate owns the data shapes exchanged between `mapmind` (server),
//! `client` (browser), and `cli`. It has no platform dependencies so the same
//! validation and history rules run natively and in WASM.
//!
//! ARCHITECTURE
//! ============
//! - `types`: request/result wire types plus strict result parsing.
//! - `kroki`: deflate + base64url payload encoding for the external renderer.
//! - `history`: bounded newest-first history over an injected storage backend.

pub mod history;
pub mod kroki;
pub mod types;

pub use history::{HISTORY_KEY, HISTORY_LIMIT, HistoryEntry, HistoryStorage, HistoryStore, MemoryStorage, StorageError};
pub use kroki::{DEFAULT_KROKI_ROOT, DecodeError, DiagramRenderer, KrokiRenderer, OutputFormat, RenderLinks, decode_payload, encode_payload};
pub use types::{
    Depth, DiagramStyle, GenerationRequest, GenerationResult, ImageError, ParseError, UnknownVariant, UploadedImage,
};
