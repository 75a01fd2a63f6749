//! Generator workspace state: current inputs, output, and request status.
//!
//! DESIGN
//! ======
//! A plain struct held in one `RwSignal` and provided via context. All
//! transitions are methods so the page and components never poke fields in
//! an order that breaks the invariants below:
//! - at most one request is in flight (`can_submit` gates `begin_generation`)
//! - a failure never clears the previous diagram or questions
//! - restoring a history entry drops any pending image
//! - a file read only lands if no newer read, reset, or restore happened since

#[cfg(test)]
#[path = "workspace_test.rs"]
mod workspace_test;

use mapkit::{Depth, DiagramStyle, GenerationRequest, GenerationResult, HistoryEntry, UploadedImage};

/// User-visible message for any failed generation.
pub const GENERATION_FAILED_MESSAGE: &str = "Could not generate the concept map. Check your input and try again.";

/// Lifecycle of the most recent generation request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GenerationStatus {
    #[default]
    Idle,
    Analyzing,
    Success,
    Error,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkspaceState {
    pub input_text: String,
    pub depth: Depth,
    pub style: DiagramStyle,
    pub image: Option<UploadedImage>,
    /// True while a file read for `image` is pending.
    pub image_loading: bool,
    /// Ticket of the newest image read; older reads are ignored when they finish.
    pub image_read_seq: u64,
    pub diagram_code: String,
    pub questions: Vec<String>,
    pub explanation: Option<String>,
    pub status: GenerationStatus,
    pub error: Option<String>,
}

impl WorkspaceState {
    #[must_use]
    pub fn has_input(&self) -> bool {
        !self.input_text.trim().is_empty() || self.image.is_some()
    }

    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        self.status == GenerationStatus::Analyzing
    }

    /// Submit is allowed with some input, no pending image read, and no request in flight.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.has_input() && !self.image_loading && !self.is_analyzing()
    }

    /// The request the current inputs describe.
    #[must_use]
    pub fn request(&self) -> GenerationRequest {
        GenerationRequest {
            text: self.input_text.clone(),
            image: self.image.clone(),
            depth: self.depth,
            style: self.style,
        }
    }

    /// Enter `Analyzing` and return the request to send, or `None` if submit is not allowed.
    pub fn begin_generation(&mut self) -> Option<GenerationRequest> {
        if !self.can_submit() {
            return None;
        }
        self.error = None;
        self.status = GenerationStatus::Analyzing;
        Some(self.request())
    }

    pub fn apply_result(&mut self, result: GenerationResult) {
        self.diagram_code = result.diagram_code;
        self.questions = result.questions;
        self.explanation = result.explanation;
        self.status = GenerationStatus::Success;
        self.error = None;
    }

    /// Record a failed generation. Diagram and questions keep their previous values.
    pub fn apply_failure(&mut self) {
        self.status = GenerationStatus::Error;
        self.error = Some(GENERATION_FAILED_MESSAGE.to_owned());
    }

    /// Show a history entry as the current result.
    pub fn restore(&mut self, entry: &HistoryEntry) {
        self.input_text = entry.input_summary.clone();
        self.diagram_code = entry.diagram_code.clone();
        self.questions = entry.questions.clone();
        self.explanation = None;
        self.cancel_image_read();
        self.image = None;
        self.status = GenerationStatus::Success;
        self.error = None;
    }

    /// Clear the text and image inputs; output and options are kept.
    pub fn reset_inputs(&mut self) {
        self.input_text.clear();
        self.cancel_image_read();
        self.image = None;
    }

    /// Begin a file read and return its ticket for `finish_image_read`/`fail_image_read`.
    pub fn start_image_read(&mut self) -> u64 {
        self.image_read_seq += 1;
        self.image_loading = true;
        self.error = None;
        self.image_read_seq
    }

    /// Returns `false` (and changes nothing) if `ticket` is stale.
    pub fn finish_image_read(&mut self, ticket: u64, image: UploadedImage) -> bool {
        if !self.is_current_read(ticket) {
            return false;
        }
        self.image = Some(image);
        self.image_loading = false;
        true
    }

    /// Returns `false` (and changes nothing) if `ticket` is stale.
    pub fn fail_image_read(&mut self, ticket: u64, message: String) -> bool {
        if !self.is_current_read(ticket) {
            return false;
        }
        self.image = None;
        self.image_loading = false;
        self.error = Some(message);
        true
    }

    fn is_current_read(&self, ticket: u64) -> bool {
        self.image_loading && ticket == self.image_read_seq
    }

    fn cancel_image_read(&mut self) {
        self.image_read_seq += 1;
        self.image_loading = false;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Data URL for the `<img>` preview of the pending upload.
    #[must_use]
    pub fn image_preview(&self) -> Option<String> {
        self.image.as_ref().map(UploadedImage::data_url)
    }
}
