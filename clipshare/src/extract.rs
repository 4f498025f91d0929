//! Format sniffing and extraction
//!
//! Picks the single best representation out of a capture's entries and
//! decodes it into a `CanonicalRecord`. Selection is by band, highest first:
//!
//! 1. structured (JSON-like) type whose payload parses as JSON
//! 2. `text/html`
//! 3. first `image/*`, encoded as a data URI
//! 4. first `text/plain`, re-tagged as JSON when it parses as JSON
//!
//! Within a band the earliest entry wins. A read or decode failure on the
//! chosen entry fails the call; other entries are not tried.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::config::EngineConfig;
use crate::content_detection::{is_json, EntryBand, JSON_MIME, PLAIN_TEXT_MIME};
use crate::interface::{ClipError, Payload, RawEntry};
use crate::models::CanonicalRecord;

/// Entry selector and decoder
#[derive(Debug, Clone)]
pub struct Extractor {
    max_payload_bytes: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Extractor {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_payload_bytes: config.max_payload_bytes,
        }
    }

    /// Select and decode the best entry.
    ///
    /// `Ok(None)` means no entry belongs to any band; callers report that as
    /// "no usable clipboard data" rather than a failure.
    pub async fn extract(&self, entries: &[RawEntry]) -> Result<Option<CanonicalRecord>, ClipError> {
        // Structured entries only count once their payload proves to be JSON
        for entry in in_band(entries, EntryBand::Structured) {
            let text = self.read_text(entry).await?;
            if is_json(&text) {
                debug!(mime_type = %entry.mime_type, "selected structured entry");
                return Ok(Some(CanonicalRecord::new(text, entry.mime_type.clone())));
            }
            debug!(mime_type = %entry.mime_type, "structured entry is not well-formed JSON, skipping");
        }

        if let Some(entry) = in_band(entries, EntryBand::Html).next() {
            debug!("selected html entry");
            let text = self.read_text(entry).await?;
            return Ok(Some(CanonicalRecord::new(text, entry.mime_type.clone())));
        }

        if let Some(entry) = in_band(entries, EntryBand::Image).next() {
            debug!(mime_type = %entry.mime_type, "selected image entry");
            let content = match &entry.payload {
                // Producers occasionally hand images over pre-encoded
                Payload::Inline(text) if text.starts_with("data:") => {
                    self.check_size(entry, text.len() as u64)?;
                    text.clone()
                }
                _ => data_uri(&entry.mime_type, &self.read_bytes(entry).await?),
            };
            return Ok(Some(CanonicalRecord::new(content, entry.mime_type.clone())));
        }

        if let Some(entry) = in_band(entries, EntryBand::PlainText).next() {
            let text = self.read_text(entry).await?;
            let content_type = if is_json(&text) { JSON_MIME } else { PLAIN_TEXT_MIME };
            debug!(content_type, "selected plain text entry");
            return Ok(Some(CanonicalRecord::new(text, content_type)));
        }

        debug!(count = entries.len(), "no entry matched any band");
        Ok(None)
    }

    fn check_size(&self, entry: &RawEntry, size: u64) -> Result<(), ClipError> {
        if size > self.max_payload_bytes as u64 {
            return Err(ClipError::decode(
                &entry.mime_type,
                format!(
                    "payload of {} bytes exceeds the {} byte limit",
                    size, self.max_payload_bytes
                ),
            ));
        }
        Ok(())
    }

    async fn read_bytes(&self, entry: &RawEntry) -> Result<Vec<u8>, ClipError> {
        if let Some(size) = entry.payload.size_hint() {
            self.check_size(entry, size)?;
        }
        let bytes = match &entry.payload {
            Payload::Inline(text) => text.clone().into_bytes(),
            Payload::Binary(blob) => blob
                .read()
                .await
                .map_err(|e| ClipError::decode(&entry.mime_type, e.to_string()))?,
        };
        // size hints are advisory; check what actually arrived
        self.check_size(entry, bytes.len() as u64)?;
        Ok(bytes)
    }

    async fn read_text(&self, entry: &RawEntry) -> Result<String, ClipError> {
        match &entry.payload {
            Payload::Inline(text) => {
                self.check_size(entry, text.len() as u64)?;
                Ok(text.clone())
            }
            Payload::Binary(_) => {
                let bytes = self.read_bytes(entry).await?;
                String::from_utf8(bytes)
                    .map_err(|_| ClipError::decode(&entry.mime_type, "payload is not valid UTF-8"))
            }
        }
    }
}

fn in_band(entries: &[RawEntry], band: EntryBand) -> impl Iterator<Item = &RawEntry> {
    entries
        .iter()
        .filter(move |entry| EntryBand::of(&entry.mime_type) == Some(band))
}

/// `data:<mime>;base64,<payload>`
pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}
