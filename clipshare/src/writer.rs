//! Clipboard export
//!
//! Writes a record back to the system clipboard. Structured content goes out
//! as `application/json`, everything else as `text/plain`. Failures are
//! reported as `false`; the record itself is never touched.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::content_detection::{JSON_MIME, PLAIN_TEXT_MIME};
use crate::input::ClipboardItemData;
use crate::interface::{ClipboardAccessError, ClipboardPayload, SystemClipboard};
use crate::models::CanonicalRecord;

/// Exports records through a `SystemClipboard`
#[derive(Clone)]
pub struct ClipboardWriter {
    clipboard: Arc<dyn SystemClipboard>,
}

impl ClipboardWriter {
    pub fn new(clipboard: Arc<dyn SystemClipboard>) -> Self {
        Self { clipboard }
    }

    /// Payload written for `record`
    pub fn payload_for(record: &CanonicalRecord) -> ClipboardPayload {
        let mime_type = if record.looks_renameable() {
            JSON_MIME
        } else {
            PLAIN_TEXT_MIME
        };
        ClipboardPayload::from([(mime_type.to_string(), record.content.clone())])
    }

    /// Write `record`. `false` on denied permission or a missing clipboard
    /// API; callers surface that to the user and keep the record for a retry.
    pub async fn write(&self, record: &CanonicalRecord) -> bool {
        match self.clipboard.write(Self::payload_for(record)).await {
            Ok(()) => {
                debug!(content_type = %record.content_type, "wrote record to clipboard");
                true
            }
            Err(e) => {
                warn!(error = %e, "clipboard write failed");
                false
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IN-MEMORY CLIPBOARD
// ─────────────────────────────────────────────────────────────────────────────

/// Access policy for an in-memory clipboard operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    #[default]
    Granted,
    Denied,
    Unavailable,
}

impl Permission {
    fn check(self) -> Result<(), ClipboardAccessError> {
        match self {
            Permission::Granted => Ok(()),
            Permission::Denied => Err(ClipboardAccessError::PermissionDenied),
            Permission::Unavailable => Err(ClipboardAccessError::Unavailable),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryClipboardState {
    items: Vec<ClipboardItemData>,
    last_write: Option<ClipboardPayload>,
    read_permission: Permission,
    write_permission: Permission,
}

/// Process-local clipboard for headless use and tests.
/// A successful write replaces what `read_items` returns.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    state: Mutex<MemoryClipboardState>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<ClipboardItemData>) -> Self {
        let clipboard = Self::new();
        clipboard.state.lock().items = items;
        clipboard
    }

    pub fn set_read_permission(&self, permission: Permission) {
        self.state.lock().read_permission = permission;
    }

    pub fn set_write_permission(&self, permission: Permission) {
        self.state.lock().write_permission = permission;
    }

    pub fn last_write(&self) -> Option<ClipboardPayload> {
        self.state.lock().last_write.clone()
    }
}

#[async_trait]
impl SystemClipboard for MemoryClipboard {
    async fn read_items(&self) -> Result<Vec<ClipboardItemData>, ClipboardAccessError> {
        let state = self.state.lock();
        state.read_permission.check()?;
        Ok(state.items.clone())
    }

    async fn write(&self, payload: ClipboardPayload) -> Result<(), ClipboardAccessError> {
        let mut state = self.state.lock();
        state.write_permission.check()?;
        let item = payload
            .iter()
            .fold(ClipboardItemData::new(), |item, (mime, text)| item.with_text(mime.clone(), text.clone()));
        state.items = vec![item];
        state.last_write = Some(payload);
        Ok(())
    }
}
