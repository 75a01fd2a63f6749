//! Clipboard and download helpers for exporting diagrams.
//!
//! TRADE-OFFS
//! ==========
//! Both are best-effort browser-only behavior. SSR paths no-op and report
//! failure so callers never show a "Copied" confirmation that did not happen.

use mapkit::OutputFormat;

/// Suggested filename for a downloaded diagram.
#[must_use]
pub fn download_filename(format: OutputFormat) -> String {
    format!("concept-map.{}", format.extension())
}

/// Copy `text` to the system clipboard. Returns `true` if the write was issued.
pub fn copy_text(text: &str) -> bool {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            if let Some(clipboard) = window.navigator().clipboard() {
                drop(clipboard.write_text(text));
                return true;
            }
        }
        log::warn!("clipboard: unavailable");
        false
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = text;
        false
    }
}

/// Trigger a browser download of `url` by clicking a temporary anchor.
pub fn download(url: &str, format: OutputFormat) {
    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen::JsCast;

        let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Ok(anchor) = doc.create_element("a") else {
            return;
        };
        let Ok(anchor) = anchor.dyn_into::<web_sys::HtmlAnchorElement>() else {
            return;
        };
        anchor.set_href(url);
        anchor.set_download(&download_filename(format));
        anchor.set_target("_blank");
        anchor.click();
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (url, format);
    }
}

#[cfg(test)]
#[path = "clipboard_test.rs"]
mod clipboard_test;
