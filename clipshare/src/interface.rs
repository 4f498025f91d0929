//! clipshare Interface Definition
//!
//! Shared types handed between the capture adapter, the extractor, the rename
//! engine and the UI layer, plus the trait seams for lazily-read blobs, the
//! system clipboard and the persistence collaborator.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::ClipboardItemData;

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRIES
// ═══════════════════════════════════════════════════════════════════════════════

/// A browser-owned handle (Blob or File) whose bytes are only available after
/// an asynchronous read.
#[async_trait]
pub trait BlobSource: Send + Sync {
    /// Read the complete contents.
    async fn read(&self) -> Result<Vec<u8>, BlobReadError>;

    /// Size in bytes when the producer declares it up front.
    fn size_hint(&self) -> Option<u64> {
        None
    }
}

/// Blob backed by bytes already in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBlob {
    bytes: Vec<u8>,
}

impl MemoryBlob {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into() }
    }
}

#[async_trait]
impl BlobSource for MemoryBlob {
    async fn read(&self) -> Result<Vec<u8>, BlobReadError> {
        Ok(self.bytes.clone())
    }

    fn size_hint(&self) -> Option<u64> {
        Some(self.bytes.len() as u64)
    }
}

/// Entry payload: text the producer already handed over, or a blob to read
#[derive(Clone)]
pub enum Payload {
    Inline(String),
    Binary(Arc<dyn BlobSource>),
}

impl Payload {
    pub fn binary(blob: impl BlobSource + 'static) -> Self {
        Payload::Binary(Arc::new(blob))
    }

    /// Declared size, if known without reading
    pub fn size_hint(&self) -> Option<u64> {
        match self {
            Payload::Inline(text) => Some(text.len() as u64),
            Payload::Binary(blob) => blob.size_hint(),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Inline(text) => write!(f, "Inline({} bytes)", text.len()),
            Payload::Binary(blob) => match blob.size_hint() {
                Some(size) => write!(f, "Binary({} bytes)", size),
                None => write!(f, "Binary(unknown size)"),
            },
        }
    }
}

/// One `(mimeType, payload)` offer from a capture surface.
/// `mime_type` is already normalized (lowercase, no parameters).
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub mime_type: String,
    pub payload: Payload,
}

impl RawEntry {
    pub fn text(mime_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload: Payload::Inline(text.into()),
        }
    }

    pub fn binary(mime_type: impl Into<String>, blob: impl BlobSource + 'static) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload: Payload::binary(blob),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// Whole-token class rename: `from` is replaced by `to` wherever it appears as
/// a complete whitespace-delimited token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenameRule {
    pub from: String,
    pub to: String,
}

impl RenameRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Result of a rename pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    /// Rewritten content, or the untouched input when nothing changed
    pub content: String,
    /// False when the content could not be parsed as a document tree
    pub renameable: bool,
    /// Number of tokens replaced
    pub replacements: usize,
}

/// Record handed to the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub title: String,
    pub content: String,
    pub content_type: String,
    pub screenshot_url: Option<String>,
    pub library_id: String,
}

/// MIME type → payload map written to the system clipboard
pub type ClipboardPayload = BTreeMap<String, String>;

/// User-facing notification. The core only builds these; showing them is up
/// to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            destructive: false,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            destructive: true,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Direction of a clipboard access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipboardAccess {
    Read,
    Write,
}

impl fmt::Display for ClipboardAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardAccess::Read => f.write_str("read"),
            ClipboardAccess::Write => f.write_str("write"),
        }
    }
}

/// Error type for extraction, rename and export operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipError {
    #[error("No usable clipboard data")]
    NoUsableData,
    #[error("Failed to decode {mime_type} entry: {reason}")]
    DecodeFailure { mime_type: String, reason: String },
    #[error("Clipboard {access} denied: {reason}")]
    PermissionDenied {
        access: ClipboardAccess,
        reason: String,
    },
    #[error("Structured content could not be parsed: {0}")]
    MalformedStructured(String),
}

impl ClipError {
    pub(crate) fn decode(mime_type: &str, reason: impl Into<String>) -> Self {
        ClipError::DecodeFailure {
            mime_type: mime_type.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn denied(access: ClipboardAccess, error: &ClipboardAccessError) -> Self {
        ClipError::PermissionDenied {
            access,
            reason: error.to_string(),
        }
    }

    /// The message shown to the user for this failure
    pub fn notice(&self) -> Notice {
        match self {
            ClipError::NoUsableData => Notice::error(
                "No valid clipboard data",
                "Could not extract data from clipboard",
            ),
            ClipError::DecodeFailure { mime_type, .. } => Notice::error(
                "Failed to process clipboard data",
                format!("The {} content could not be decoded", mime_type),
            ),
            ClipError::PermissionDenied {
                access: ClipboardAccess::Read,
                ..
            } => Notice::error(
                "Failed to read clipboard",
                "Make sure you've granted clipboard permission",
            ),
            ClipError::PermissionDenied {
                access: ClipboardAccess::Write,
                ..
            } => Notice::error("Copy failed", "Please try again or copy manually"),
            ClipError::MalformedStructured(_) => Notice::error(
                "Content is not valid JSON",
                "Class renaming is unavailable; the content was left unchanged",
            ),
        }
    }
}

/// Blob read failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlobReadError {
    #[error("Blob read failed: {0}")]
    Io(String),
    #[error("Blob is no longer available")]
    Gone,
}

/// System clipboard access failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardAccessError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("clipboard API unavailable")]
    Unavailable,
    #[error("platform error: {0}")]
    Platform(String),
}

/// Persistence failure, as seen by the core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("No library selected")]
    NoLibrary,
    #[error("Authentication required")]
    AuthenticationRequired,
    #[error("Storage error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Classify a raw backend message. Row-level security rejections mean the
    /// caller is not signed in.
    pub fn from_backend_message(message: &str) -> Self {
        if message.contains("row-level security policy") {
            StoreError::AuthenticationRequired
        } else {
            StoreError::Backend(message.to_string())
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            StoreError::Validation(message) => Notice::error("Cannot save item", message.clone()),
            StoreError::NoLibrary => Notice::error(
                "No library selected",
                "Please select a library to save this item to.",
            ),
            StoreError::AuthenticationRequired => Notice::error(
                "Authentication required",
                "Please sign in to save items.",
            ),
            StoreError::Backend(_) => Notice::error(
                "Error saving item",
                "An error occurred while saving the item.",
            ),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVICE INTERFACE
// ═══════════════════════════════════════════════════════════════════════════════

/// The platform clipboard. Globally shared and unlocked; implementations only
/// report the outcome of their own attempt.
#[async_trait]
pub trait SystemClipboard: Send + Sync {
    /// Read the structured clipboard-item list (async clipboard API).
    /// May suspend on a permission prompt.
    async fn read_items(&self) -> Result<Vec<ClipboardItemData>, ClipboardAccessError>;

    /// Replace the clipboard contents with `payload`.
    async fn write(&self, payload: ClipboardPayload) -> Result<(), ClipboardAccessError>;
}

/// Write contract of the persistence layer
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn save(&self, record: SaveRecord) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_are_distinct() {
        let errors = vec![
            ClipError::NoUsableData,
            ClipError::decode("image/png", "truncated"),
            ClipError::PermissionDenied {
                access: ClipboardAccess::Read,
                reason: "denied".into(),
            },
            ClipError::PermissionDenied {
                access: ClipboardAccess::Write,
                reason: "denied".into(),
            },
            ClipError::MalformedStructured("eof".into()),
        ];
        let notices: Vec<Notice> = errors.iter().map(ClipError::notice).collect();
        for (i, a) in notices.iter().enumerate() {
            assert!(a.destructive);
            for b in notices.iter().skip(i + 1) {
                assert_ne!(a, b, "each failure needs its own message");
            }
        }
    }

    #[test]
    fn test_store_error_classification() {
        assert_eq!(
            StoreError::from_backend_message(
                "new row violates row-level security policy for table \"items\""
            ),
            StoreError::AuthenticationRequired
        );
        assert_eq!(
            StoreError::from_backend_message("connection reset"),
            StoreError::Backend("connection reset".into())
        );
    }

    #[test]
    fn test_save_record_wire_names() {
        let record = SaveRecord {
            title: "t".into(),
            content: "{}".into(),
            content_type: "application/json".into(),
            screenshot_url: None,
            library_id: "lib-1".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["contentType"], "application/json");
        assert_eq!(json["libraryId"], "lib-1");
        assert!(json["screenshotUrl"].is_null());
    }

    #[test]
    fn test_payload_debug_hides_contents() {
        let payload = Payload::Inline("secret".into());
        assert_eq!(format!("{:?}", payload), "Inline(6 bytes)");
        let payload = Payload::binary(MemoryBlob::new(vec![1, 2, 3]));
        assert_eq!(format!("{:?}", payload), "Binary(3 bytes)");
    }
}
