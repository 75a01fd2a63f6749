//! Generation request/result types shared by server, browser, and CLI.
//!
//! DESIGN
//! ======
//! The generative service is untrusted input. `GenerationResult::from_json`
//! fails closed: unknown fields, missing fields, wrong types, and an empty
//! diagram are all rejected rather than patched up.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Input summary stored in history when only an image was submitted.
pub const IMAGE_ONLY_SUMMARY: &str = "Image analysis";

// =============================================================================
// ERRORS
// =============================================================================

/// Errors produced while parsing a generation result.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The payload was not valid JSON or did not match the result schema.
    #[error("result does not match schema: {0}")]
    Schema(#[from] serde_json::Error),

    /// `diagramCode` was present but blank.
    #[error("result has an empty diagramCode")]
    EmptyDiagram,
}

/// Errors produced while building an [`UploadedImage`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("not a base64 data URL")]
    NotDataUrl,
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("image payload is not valid base64")]
    InvalidBase64,
    #[error("image payload is empty")]
    Empty,
}

/// An option string that does not name a known variant.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// =============================================================================
// OPTIONS
// =============================================================================

/// How much detail the generated map should carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    Summary,
    #[default]
    Detailed,
}

impl Depth {
    pub const ALL: [Self; 2] = [Self::Summary, Self::Detailed];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Detailed => "detailed",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::Detailed => "Detailed",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Depth {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(Self::Summary),
            "detailed" => Ok(Self::Detailed),
            other => Err(UnknownVariant { kind: "depth", value: other.to_owned() }),
        }
    }
}

/// Layout family requested for the diagram.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramStyle {
    #[default]
    Hierarchical,
    Flow,
    Radial,
}

impl DiagramStyle {
    pub const ALL: [Self; 3] = [Self::Hierarchical, Self::Flow, Self::Radial];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hierarchical => "hierarchical",
            Self::Flow => "flow",
            Self::Radial => "radial",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Hierarchical => "Hierarchical",
            Self::Flow => "Flow",
            Self::Radial => "Radial",
        }
    }

    /// Mermaid graph direction: flow charts read left-to-right, the rest top-down.
    #[must_use]
    pub fn direction(self) -> &'static str {
        match self {
            Self::Flow => "LR",
            Self::Hierarchical | Self::Radial => "TD",
        }
    }
}

impl fmt::Display for DiagramStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramStyle {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hierarchical" => Ok(Self::Hierarchical),
            "flow" => Ok(Self::Flow),
            "radial" => Ok(Self::Radial),
            other => Err(UnknownVariant { kind: "style", value: other.to_owned() }),
        }
    }
}

// =============================================================================
// UPLOADED IMAGE
// =============================================================================

/// An image held in memory for a single generation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    /// Standard base64 of the raw image bytes.
    pub data: String,
    pub mime_type: String,
}

impl UploadedImage {
    /// Parse a browser data URL of the form `data:<mime>;base64,<payload>`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] if the URL is not a base64 data URL, the MIME
    /// type is not `image/*`, or the payload is empty.
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let rest = url.strip_prefix("data:").ok_or(ImageError::NotDataUrl)?;
        let (header, data) = rest.split_once(',').ok_or(ImageError::NotDataUrl)?;
        let mime_type = header.strip_suffix(";base64").ok_or(ImageError::NotDataUrl)?;
        if !is_supported_mime(mime_type) {
            return Err(ImageError::UnsupportedType(mime_type.to_owned()));
        }
        if data.is_empty() {
            return Err(ImageError::Empty);
        }
        Ok(Self { data: data.to_owned(), mime_type: mime_type.to_owned() })
    }

    /// Encode raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] if the MIME type is not `image/*` or `bytes` is empty.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Result<Self, ImageError> {
        if !is_supported_mime(mime_type) {
            return Err(ImageError::UnsupportedType(mime_type.to_owned()));
        }
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        Ok(Self { data: STANDARD.encode(bytes), mime_type: mime_type.to_owned() })
    }

    /// Check the payload is supported and decodes as base64.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ImageError> {
        if !is_supported_mime(&self.mime_type) {
            return Err(ImageError::UnsupportedType(self.mime_type.clone()));
        }
        if self.data.is_empty() {
            return Err(ImageError::Empty);
        }
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|_| ImageError::InvalidBase64)?;
        Ok(())
    }

    /// Rebuild the data URL, e.g. for an `<img>` preview.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Only `image/*` uploads are forwarded to the generative service.
#[must_use]
pub fn is_supported_mime(mime_type: &str) -> bool {
    mime_type
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

// =============================================================================
// REQUEST / RESULT
// =============================================================================

/// Browser-to-server generation request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<UploadedImage>,
    #[serde(default)]
    pub depth: Depth,
    #[serde(default)]
    pub style: DiagramStyle,
}

impl GenerationRequest {
    /// `true` when there is non-blank text or an image to analyse.
    #[must_use]
    pub fn has_input(&self) -> bool {
        !self.text.trim().is_empty() || self.image.is_some()
    }

    /// Short description of the input for the history list.
    #[must_use]
    pub fn input_summary(&self) -> String {
        let trimmed = self.text.trim();
        if trimmed.is_empty() { IMAGE_ONLY_SUMMARY.to_owned() } else { trimmed.to_owned() }
    }
}

/// A generated concept map: Mermaid source plus self-assessment questions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GenerationResult {
    pub diagram_code: String,
    pub questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl GenerationResult {
    /// Strictly parse a JSON document into a result.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Schema`] for malformed JSON, missing or unknown
    /// fields, and [`ParseError::EmptyDiagram`] for a blank diagram.
    pub fn from_json(raw: &str) -> Result<Self, ParseError> {
        let result: Self = serde_json::from_str(raw.trim())?;
        result.validate()?;
        Ok(result)
    }

    /// Enforce invariants that the JSON shape alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyDiagram`] if `diagram_code` is blank.
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.diagram_code.trim().is_empty() {
            return Err(ParseError::EmptyDiagram);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
