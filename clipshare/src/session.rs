//! Per-UI-session capture state
//!
//! Drives one extraction-to-write cycle:
//!
//! ```text
//! Idle → Capturing → Extracting → Ready → (Formatting | Renaming)* → Exporting → Idle
//!                        │                                              │
//!                        └── failure → Idle                             └── failure → Ready
//! ```
//!
//! Overlapping captures are not serialized. Each capture takes a ticket; a
//! result whose ticket is older than the newest *applied* result is
//! discarded, so the newest capture always wins regardless of which read
//! finishes first. Failures never clear the record on display.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::extract::Extractor;
use crate::input::{collect_entries, CaptureSource};
use crate::interface::{
    ClipError, ClipboardAccess, ItemStore, Notice, RenameOutcome, RenameRule, StoreError,
    SystemClipboard,
};
use crate::models::{CanonicalRecord, CaptureOrigin, HistoryEntry};
use crate::rename;
use crate::store::{self, SaveRequest};
use crate::writer::ClipboardWriter;

/// Where the session is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Capturing,
    Extracting,
    Ready,
    Formatting,
    Renaming,
    Exporting,
}

/// Sequence token handed out when a capture starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureTicket(u64);

impl CaptureTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// What happened to a completed capture
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureResolution {
    /// The record is now on display
    Applied(CanonicalRecord),
    /// A newer capture was already applied; this result was dropped
    Superseded,
    /// Extraction failed; the previous record (if any) is still on display
    Failed(ClipError),
}

impl CaptureResolution {
    /// Notice for the UI, None for a silently discarded result
    pub fn notice(&self, origin: CaptureOrigin) -> Option<Notice> {
        match self {
            CaptureResolution::Applied(_) => Some(Notice::info(
                "Clipboard content parsed",
                format!("Successfully parsed {} content", origin.label()),
            )),
            CaptureResolution::Superseded => None,
            CaptureResolution::Failed(e) => Some(e.notice()),
        }
    }
}

/// State of one UI session: the record on display, its history and the
/// capture sequence
pub struct ClipboardSession {
    config: EngineConfig,
    extractor: Extractor,
    state: SessionState,
    current: Option<CanonicalRecord>,
    history: VecDeque<HistoryEntry>,
    last_issued: u64,
    last_applied: u64,
}

impl Default for ClipboardSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ClipboardSession {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            extractor: Extractor::new(&config),
            config,
            state: SessionState::Idle,
            current: None,
            history: VecDeque::new(),
            last_issued: 0,
            last_applied: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Record on display
    pub fn current(&self) -> Option<&CanonicalRecord> {
        self.current.as_ref()
    }

    /// Parsed captures, newest first
    pub fn history(&self) -> &VecDeque<HistoryEntry> {
        &self.history
    }

    /// Whether the UI should offer class renaming
    pub fn looks_renameable(&self) -> bool {
        self.current.as_ref().is_some_and(CanonicalRecord::looks_renameable)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Capture
    // ─────────────────────────────────────────────────────────────────────────

    /// Start a capture. The ticket must be passed back to `complete_capture`.
    pub fn begin_capture(&mut self) -> CaptureTicket {
        self.last_issued += 1;
        self.state = SessionState::Capturing;
        CaptureTicket(self.last_issued)
    }

    /// Entries have been collected and are being decoded
    pub fn mark_extracting(&mut self) {
        self.state = SessionState::Extracting;
    }

    /// Apply (or discard) the result of a capture started with `ticket`
    pub fn complete_capture(
        &mut self,
        ticket: CaptureTicket,
        origin: CaptureOrigin,
        result: Result<Option<CanonicalRecord>, ClipError>,
    ) -> CaptureResolution {
        if ticket.0 <= self.last_applied {
            debug!(
                ticket = ticket.0,
                applied = self.last_applied,
                "discarding superseded capture"
            );
            return CaptureResolution::Superseded;
        }

        match result {
            Ok(Some(record)) => {
                info!(
                    origin = origin.label(),
                    content_type = %record.content_type,
                    "clipboard content parsed"
                );
                self.last_applied = ticket.0;
                self.current = Some(record.clone());
                self.history.push_front(HistoryEntry::new(record.clone(), origin));
                self.history.truncate(self.config.history_limit);
                self.state = SessionState::Ready;
                CaptureResolution::Applied(record)
            }
            Ok(None) => self.fail_capture(ticket, ClipError::NoUsableData),
            Err(e) => self.fail_capture(ticket, e),
        }
    }

    /// Back to `Idle` unless a newer capture is still in flight
    fn fail_capture(&mut self, ticket: CaptureTicket, error: ClipError) -> CaptureResolution {
        warn!(ticket = ticket.0, error = %error, "capture failed");
        if ticket.0 == self.last_issued {
            self.state = SessionState::Idle;
        }
        CaptureResolution::Failed(error)
    }

    /// Paste event or drop: normalize, extract, apply
    pub async fn capture(&mut self, source: &CaptureSource) -> CaptureResolution {
        let ticket = self.begin_capture();
        self.run_capture(ticket, source).await
    }

    /// Async clipboard API path. A blocked read is `PermissionDenied`.
    pub async fn read_system_clipboard(&mut self, clipboard: &dyn SystemClipboard) -> CaptureResolution {
        let ticket = self.begin_capture();
        match clipboard.read_items().await {
            Ok(items) => {
                self.run_capture(ticket, &CaptureSource::ClipboardItems(items))
                    .await
            }
            Err(e) => self.complete_capture(
                ticket,
                CaptureOrigin::ClipboardItems,
                Err(ClipError::denied(ClipboardAccess::Read, &e)),
            ),
        }
    }

    async fn run_capture(&mut self, ticket: CaptureTicket, source: &CaptureSource) -> CaptureResolution {
        let entries = collect_entries(source);
        self.mark_extracting();
        let result = self.extractor.extract(&entries).await;
        self.complete_capture(ticket, source.origin(), result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Display and edit
    // ─────────────────────────────────────────────────────────────────────────

    /// Rendering of the record on display
    pub fn display(&mut self) -> Option<String> {
        let record = self.current.as_ref()?;
        self.state = SessionState::Formatting;
        let rendered = record.display();
        self.state = SessionState::Ready;
        Some(rendered)
    }

    /// Rename class tokens in the record on display.
    ///
    /// Records that do not look renameable (HTML, images, prose) are left as
    /// they are with `renameable = false`, even when their text happens to
    /// parse. Content tagged as structured that does not parse yields
    /// `MalformedStructured`.
    pub fn rename(&mut self, rules: &[RenameRule]) -> Result<RenameOutcome, ClipError> {
        let record = self.current.as_ref().ok_or(ClipError::NoUsableData)?;
        if !record.looks_renameable() {
            debug!(content_type = %record.content_type, "record is not renameable");
            return Ok(RenameOutcome {
                content: record.content.clone(),
                renameable: false,
                replacements: 0,
            });
        }
        self.state = SessionState::Renaming;
        let outcome = rename::rename(&record.content, rules);
        let structured = record.is_structured();

        let result = if !outcome.renameable && structured {
            Err(ClipError::MalformedStructured(format!(
                "{} content does not parse",
                record.content_type
            )))
        } else {
            if outcome.replacements > 0 {
                self.current = Some(record.with_content(outcome.content.clone()));
            }
            Ok(outcome)
        };
        self.state = SessionState::Ready;
        result
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export and save
    // ─────────────────────────────────────────────────────────────────────────

    /// Copy the record on display to the system clipboard. On failure the
    /// session returns to `Ready` with the record retained for a retry.
    pub async fn export(&mut self, writer: &ClipboardWriter) -> Result<(), ClipError> {
        let record = self.current.clone().ok_or(ClipError::NoUsableData)?;
        self.state = SessionState::Exporting;
        if writer.write(&record).await {
            self.state = SessionState::Idle;
            Ok(())
        } else {
            self.state = SessionState::Ready;
            Err(ClipError::PermissionDenied {
                access: ClipboardAccess::Write,
                reason: "clipboard write was not permitted".into(),
            })
        }
    }

    /// Save the record on display through `store`
    pub async fn save(
        &self,
        store: &dyn ItemStore,
        title: &str,
        library_id: Option<&str>,
        screenshot_url: Option<&str>,
    ) -> Result<(), StoreError> {
        let record = self
            .current
            .as_ref()
            .ok_or_else(|| StoreError::Validation("Nothing to save".into()))?;
        let mut request = SaveRequest::new(record).title(title);
        if let Some(id) = library_id {
            request = request.library(id);
        }
        if let Some(url) = screenshot_url {
            request = request.screenshot(url);
        }
        store::save_item(store, request, &self.config).await
    }

    /// Forget the history and the record on display
    pub fn clear_history(&mut self) -> Notice {
        self.history.clear();
        self.current = None;
        self.state = SessionState::Idle;
        Notice::info("Cleared", "Clipboard history has been cleared")
    }
}
