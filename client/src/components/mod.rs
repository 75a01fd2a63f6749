//! Reusable UI components for the generator page.
//!
//! ARCHITECTURE
//! ============
//! Components read and write the shared `WorkspaceState` and history store
//! from context. Network calls stay in the page.

pub mod diagram_preview;
pub mod history_sidebar;
pub mod question_list;
pub mod source_panel;
