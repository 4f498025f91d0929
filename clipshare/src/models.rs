//! Core data models for clipshare
//!
//! `CanonicalRecord` is the one value extraction produces and everything
//! downstream (display, rename, export, save) consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content_detection::{self, PLAIN_TEXT_MIME};

// ─────────────────────────────────────────────────────────────────────────────
// CANONICAL RECORD
// ─────────────────────────────────────────────────────────────────────────────

/// Normalized `(content, contentType)` pair.
/// `content` is always valid UTF-8; images are carried as data URIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    pub content: String,
    pub content_type: String,
}

impl CanonicalRecord {
    pub fn new(content: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: content_type.into(),
        }
    }

    /// Plain text record
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(content, PLAIN_TEXT_MIME)
    }

    /// Tagged as JSON-like tree data
    pub fn is_structured(&self) -> bool {
        content_detection::is_structured_type(&self.content_type)
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Whether class renaming should be offered (also decides the MIME type
    /// used when the record is copied back out)
    pub fn looks_renameable(&self) -> bool {
        content_detection::looks_renameable(&self.content, &self.content_type)
    }

    /// Human-readable rendering for display
    pub fn display(&self) -> String {
        crate::format::format_content(&self.content, &self.content_type)
    }

    /// Same content type, new content
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self::new(content, self.content_type.clone())
    }

    /// Single-line preview (whitespace collapsed, at most `max_chars` chars).
    /// Images preview as their content type rather than base64 noise.
    pub fn snippet(&self, max_chars: usize) -> String {
        if self.is_image() {
            return format!("Image ({})", self.content_type);
        }
        self.content
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(max_chars)
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HISTORY
// ─────────────────────────────────────────────────────────────────────────────

/// Which capture surface a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureOrigin {
    /// Async clipboard API (`navigator.clipboard.read()`)
    ClipboardItems,
    /// Paste event clipboard data
    PasteEvent,
    /// Drag-and-drop transfer
    DragDrop,
}

impl CaptureOrigin {
    /// Label shown next to parsed content
    pub fn label(&self) -> &'static str {
        match self {
            CaptureOrigin::ClipboardItems => "ClipboardItems",
            CaptureOrigin::PasteEvent => "clipboardData",
            CaptureOrigin::DragDrop => "dataTransfer",
        }
    }
}

/// A parsed capture, as kept in the session history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub record: CanonicalRecord,
    pub origin: CaptureOrigin,
    pub captured_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(record: CanonicalRecord, origin: CaptureOrigin) -> Self {
        Self {
            record,
            origin,
            captured_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_classification() {
        let json = CanonicalRecord::new(r#"{"a":1}"#, "application/json");
        assert!(json.is_structured());
        assert!(json.looks_renameable());
        assert!(!json.is_image());

        let text = CanonicalRecord::text("hello world");
        assert!(!text.is_structured());
        assert!(!text.looks_renameable());

        let image = CanonicalRecord::new("data:image/png;base64,AAAA", "image/png");
        assert!(image.is_image());
        assert!(!image.looks_renameable());
    }

    #[test]
    fn test_snippet_whitespace_normalization() {
        let record = CanonicalRecord::text("  hello\n\nworld  ");
        assert_eq!(record.snippet(200), "hello world");
        assert_eq!(record.snippet(5), "hello");
    }

    #[test]
    fn test_snippet_for_image() {
        let image = CanonicalRecord::new("data:image/gif;base64,R0lG", "image/gif");
        assert_eq!(image.snippet(200), "Image (image/gif)");
    }

    #[test]
    fn test_record_wire_names() {
        let record = CanonicalRecord::text("x");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"content":"x","contentType":"text/plain"}"#);
    }

    #[test]
    fn test_history_entry_serializes() {
        let entry = HistoryEntry::new(CanonicalRecord::text("x"), CaptureOrigin::DragDrop);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["origin"], "DragDrop");
        assert_eq!(json["record"]["contentType"], "text/plain");
        assert!(json["capturedAt"].is_string());
    }

    #[test]
    fn test_origin_labels() {
        assert_eq!(CaptureOrigin::ClipboardItems.label(), "ClipboardItems");
        assert_eq!(CaptureOrigin::PasteEvent.label(), "clipboardData");
        assert_eq!(CaptureOrigin::DragDrop.label(), "dataTransfer");
    }
}
