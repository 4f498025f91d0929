//! Capture-surface normalization
//!
//! Browsers hand clipboard data out in three shapes: the async clipboard API's
//! item list, a paste event's clipboard data and a drop's transfer object.
//! All three are flattened here into one ordered `RawEntry` list so the
//! extractor has a single input type regardless of where data came from.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::content_detection::normalize_mime;
use crate::interface::{BlobSource, MemoryBlob, Payload, RawEntry};
use crate::models::CaptureOrigin;

// ─────────────────────────────────────────────────────────────────────────────
// CAPTURE SURFACES
// ─────────────────────────────────────────────────────────────────────────────

/// One item from the async clipboard API: every representation is a blob
#[derive(Clone, Default)]
pub struct ClipboardItemData {
    pub representations: Vec<(String, Arc<dyn BlobSource>)>,
}

impl ClipboardItemData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(mut self, mime_type: impl Into<String>, blob: impl BlobSource + 'static) -> Self {
        self.representations.push((mime_type.into(), Arc::new(blob)));
        self
    }

    pub fn with_text(self, mime_type: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_blob(mime_type, MemoryBlob::new(text.into().into_bytes()))
    }

    pub fn types(&self) -> Vec<&str> {
        self.representations.iter().map(|(mime, _)| mime.as_str()).collect()
    }
}

impl fmt::Debug for ClipboardItemData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipboardItemData")
            .field("types", &self.types())
            .finish()
    }
}

/// A file attached to a paste or drop
#[derive(Clone)]
pub struct TransferFile {
    pub name: String,
    pub mime_type: String,
    pub blob: Arc<dyn BlobSource>,
}

impl fmt::Debug for TransferFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Paste-event clipboard data or a drop's transfer object.
/// `strings` holds `(type, getData(type))` in declared type order.
#[derive(Debug, Clone, Default)]
pub struct TransferData {
    pub strings: Vec<(String, String)>,
    pub files: Vec<TransferFile>,
}

impl TransferData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_string(mut self, mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        self.strings.push((mime_type.into(), data.into()));
        self
    }

    pub fn with_file(
        mut self,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        blob: impl BlobSource + 'static,
    ) -> Self {
        self.files.push(TransferFile {
            name: name.into(),
            mime_type: mime_type.into(),
            blob: Arc::new(blob),
        });
        self
    }
}

/// Any of the three capture objects
#[derive(Debug, Clone)]
pub enum CaptureSource {
    ClipboardItems(Vec<ClipboardItemData>),
    Paste(TransferData),
    DragDrop(TransferData),
}

impl CaptureSource {
    pub fn origin(&self) -> CaptureOrigin {
        match self {
            CaptureSource::ClipboardItems(_) => CaptureOrigin::ClipboardItems,
            CaptureSource::Paste(_) => CaptureOrigin::PasteEvent,
            CaptureSource::DragDrop(_) => CaptureOrigin::DragDrop,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// NORMALIZATION
// ─────────────────────────────────────────────────────────────────────────────

/// Flatten a capture object into `RawEntry`s, keeping the producer's order.
///
/// Unsupported entries (malformed or missing MIME types, the `Files`
/// pseudo-type, empty strings) are dropped. An empty result means there is
/// nothing to extract; it is not an error.
pub fn collect_entries(source: &CaptureSource) -> Vec<RawEntry> {
    let entries = match source {
        CaptureSource::ClipboardItems(items) => from_clipboard_items(items),
        CaptureSource::Paste(data) | CaptureSource::DragDrop(data) => from_transfer(data),
    };
    debug!(
        origin = source.origin().label(),
        count = entries.len(),
        "normalized capture entries"
    );
    entries
}

/// All items are flattened into one list; a read yields one record.
fn from_clipboard_items(items: &[ClipboardItemData]) -> Vec<RawEntry> {
    items
        .iter()
        .flat_map(|item| item.representations.iter())
        .filter_map(|(mime, blob)| {
            let mime_type = supported_mime(mime)?;
            Some(RawEntry {
                mime_type,
                payload: Payload::Binary(Arc::clone(blob)),
            })
        })
        .collect()
}

fn from_transfer(data: &TransferData) -> Vec<RawEntry> {
    let strings = data.strings.iter().filter_map(|(mime, text)| {
        let mime_type = supported_mime(mime)?;
        if text.is_empty() {
            debug!(mime_type = %mime_type, "dropping empty transfer string");
            return None;
        }
        Some(RawEntry::text(mime_type, text.clone()))
    });

    let files = data.files.iter().filter_map(|file| {
        let mime_type = supported_mime(&file.mime_type)?;
        Some(RawEntry {
            mime_type,
            payload: Payload::Binary(Arc::clone(&file.blob)),
        })
    });

    strings.chain(files).collect()
}

fn supported_mime(raw: &str) -> Option<String> {
    let normalized = normalize_mime(raw);
    if normalized.is_none() {
        debug!(raw_type = raw, "dropping entry with unsupported type");
    }
    normalized
}
