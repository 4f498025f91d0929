//! clipshare core - clipboard ingestion and transformation
//!
//! Turns browser clipboard reads, paste events and drops into a single
//! canonical `(content, contentType)` record, renames class tokens inside JSON
//! payloads, and writes records back to the system clipboard or hands them to
//! a persistence collaborator.
//!
//! Platform surfaces (blobs, the system clipboard, storage) are traits in
//! [`interface`]; the rest of the crate is plain, synchronous logic plus a few
//! suspension points where those traits are awaited.

pub mod config;
pub mod content_detection;
pub mod extract;
pub mod format;
pub mod input;
pub mod interface;
pub mod models;
pub mod rename;
pub mod session;
pub mod store;
pub mod writer;

pub use config::EngineConfig;
pub use content_detection::{is_json, looks_renameable};
pub use extract::Extractor;
pub use format::format_content;
pub use input::{collect_entries, CaptureSource, ClipboardItemData, TransferData};
pub use interface::*;
pub use models::{CanonicalRecord, CaptureOrigin, HistoryEntry};
pub use rename::{class_tokens, rename, rename_content};
pub use session::{CaptureResolution, CaptureTicket, ClipboardSession, SessionState};
pub use store::{save_item, MemoryItemStore, SaveRequest};
pub use writer::{ClipboardWriter, MemoryClipboard, Permission};
