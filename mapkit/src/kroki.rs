//! Kroki payload encoding: diagram source to render URLs.
//!
//! DESIGN
//! ======
//! Rendering is delegated to an external stateless HTTP service. The service
//! reads the diagram from the URL itself:
//!
//! ```text
//! <root>/mermaid/<svg|png|jpeg>/<base64url(zlib(deflate_9(utf8(source))))>
//! ```
//!
//! The payload keeps base64 padding and only swaps `+`/`/` for `-`/`_`, which
//! is what the URL-safe alphabet does. Nothing in this module lays out graphs;
//! `DiagramRenderer` is the seam for swapping the service.

use std::fmt;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::engine::DecodePaddingMode;
use serde::{Deserialize, Serialize};

/// Public Kroki instance.
pub const DEFAULT_KROKI_ROOT: &str = "https://kroki.io";

/// Kroki diagram type path segment.
pub const DIAGRAM_TYPE: &str = "mermaid";

const COMPRESSION_LEVEL: u8 = 9;

/// URL-safe alphabet, padded on encode, padding-agnostic on decode.
const PAYLOAD_ENGINE: GeneralPurpose =
    GeneralPurpose::new(&alphabet::URL_SAFE, PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent));

// =============================================================================
// OUTPUT FORMAT
// =============================================================================

/// Image formats requested from the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
}

impl OutputFormat {
    pub const ALL: [Self; 3] = [Self::Svg, Self::Png, Self::Jpeg];

    /// URL path segment for this format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    /// File extension used for downloads.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::types::UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(crate::types::UnknownVariant { kind: "format", value: other.to_owned() }),
        }
    }
}

// =============================================================================
// PAYLOAD CODEC
// =============================================================================

/// Errors produced by [`decode_payload`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload does not inflate: {0}")]
    Inflate(String),
    #[error("payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Compress and encode diagram source for embedding in a render URL.
///
/// Returns `None` for empty source; callers treat that as "no preview".
/// Any other text, whitespace included, is encoded verbatim.
#[must_use]
pub fn encode_payload(source: &str) -> Option<String> {
    if source.is_empty() {
        return None;
    }
    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(source.as_bytes(), COMPRESSION_LEVEL);
    Some(PAYLOAD_ENGINE.encode(compressed))
}

/// Inverse of [`encode_payload`]: recover diagram source from a payload.
///
/// # Errors
///
/// Returns [`DecodeError`] if the payload is not base64url, not a zlib
/// stream, or not UTF-8 once inflated.
pub fn decode_payload(payload: &str) -> Result<String, DecodeError> {
    let compressed = PAYLOAD_ENGINE.decode(payload.trim())?;
    let raw = miniz_oxide::inflate::decompress_to_vec_zlib(&compressed)
        .map_err(|e| DecodeError::Inflate(format!("{:?}", e.status)))?;
    Ok(String::from_utf8(raw)?)
}

// =============================================================================
// RENDERER
// =============================================================================

/// External collaborator that turns diagram source into image URLs.
pub trait DiagramRenderer {
    /// URL of `source` rendered as `format`, or `None` if it cannot be encoded.
    fn render_url(&self, source: &str, format: OutputFormat) -> Option<String>;

    /// URLs for every supported format.
    fn render_links(&self, source: &str) -> Option<RenderLinks> {
        Some(RenderLinks {
            svg: self.render_url(source, OutputFormat::Svg)?,
            png: self.render_url(source, OutputFormat::Png)?,
            jpeg: self.render_url(source, OutputFormat::Jpeg)?,
        })
    }
}

/// Render URLs for a single diagram in all formats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderLinks {
    pub svg: String,
    pub png: String,
    pub jpeg: String,
}

impl RenderLinks {
    /// Build links for `source` through any renderer.
    #[must_use]
    pub fn build(renderer: &impl DiagramRenderer, source: &str) -> Option<Self> {
        renderer.render_links(source)
    }

    #[must_use]
    pub fn get(&self, format: OutputFormat) -> &str {
        match format {
            OutputFormat::Svg => &self.svg,
            OutputFormat::Png => &self.png,
            OutputFormat::Jpeg => &self.jpeg,
        }
    }
}

/// Kroki HTTP renderer rooted at a configurable service URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KrokiRenderer {
    root: String,
}

impl KrokiRenderer {
    #[must_use]
    pub fn new(root: &str) -> Self {
        Self { root: root.trim_end_matches('/').to_owned() }
    }

    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    fn url_for_payload(&self, format: OutputFormat, payload: &str) -> String {
        format!("{}/{DIAGRAM_TYPE}/{}/{payload}", self.root, format.as_str())
    }

    /// Extract the encoded payload from a URL produced by this renderer.
    #[must_use]
    pub fn payload_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let rest = url.strip_prefix(self.root.as_str())?;
        let rest = rest.strip_prefix('/')?.strip_prefix(DIAGRAM_TYPE)?.strip_prefix('/')?;
        let (format, payload) = rest.split_once('/')?;
        format.parse::<OutputFormat>().map_or(None, |_| Some(payload))
    }
}

impl Default for KrokiRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_KROKI_ROOT)
    }
}

impl DiagramRenderer for KrokiRenderer {
    fn render_url(&self, source: &str, format: OutputFormat) -> Option<String> {
        let payload = encode_payload(source)?;
        Some(self.url_for_payload(format, &payload))
    }

    fn render_links(&self, source: &str) -> Option<RenderLinks> {
        let Some(payload) = encode_payload(source) else {
            log::debug!("kroki: empty diagram source, no render links");
            return None;
        };
        Some(RenderLinks {
            svg: self.url_for_payload(OutputFormat::Svg, &payload),
            png: self.url_for_payload(OutputFormat::Png, &payload),
            jpeg: self.url_for_payload(OutputFormat::Jpeg, &payload),
        })
    }
}

#[cfg(test)]
#[path = "kroki_test.rs"]
mod tests;
