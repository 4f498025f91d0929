//! Content type detection for clipboard entries
//!
//! Normalizes MIME strings, sorts them into extraction priority bands and
//! checks text for well-formed JSON.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::IgnoredAny;

pub const JSON_MIME: &str = "application/json";
pub const HTML_MIME: &str = "text/html";
pub const PLAIN_TEXT_MIME: &str = "text/plain";

/// `type/subtype` essence, RFC 6838 token characters only
static MIME_ESSENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9!#$&^_.+-]*/[a-z0-9*][a-z0-9!#$&^_.+*-]*$").unwrap()
});

/// Normalize a MIME string: parameters dropped, trimmed, lowercased.
/// Returns None for anything that is not `type/subtype` (e.g. the `Files`
/// pseudo-type browsers put in a transfer's type list).
pub fn normalize_mime(raw: &str) -> Option<String> {
    let essence = raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    if MIME_ESSENCE_REGEX.is_match(&essence) {
        Some(essence)
    } else {
        None
    }
}

/// Whether a content type names JSON-like tree data
pub fn is_structured_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("json")
}

/// Extraction priority tier. Declaration order is priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryBand {
    Structured,
    Html,
    Image,
    PlainText,
}

impl EntryBand {
    /// Band for a normalized MIME type, None if it belongs to no band
    pub fn of(mime_type: &str) -> Option<EntryBand> {
        if is_structured_type(mime_type) {
            Some(EntryBand::Structured)
        } else if mime_type == HTML_MIME {
            Some(EntryBand::Html)
        } else if mime_type.starts_with("image/") {
            Some(EntryBand::Image)
        } else if mime_type == PLAIN_TEXT_MIME {
            Some(EntryBand::PlainText)
        } else {
            None
        }
    }
}

/// Well-formedness check without building a tree. Never panics; any parse error is `false`.
pub fn is_json(content: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(content).is_ok()
}

/// Whether the UI should offer class renaming for this content
pub fn looks_renameable(content: &str, content_type: &str) -> bool {
    is_structured_type(content_type) || (content_type == PLAIN_TEXT_MIME && is_json(content))
}
