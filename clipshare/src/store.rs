//! Save path to the persistence collaborator
//!
//! The core does not own storage. It validates what the save form collected,
//! builds a `SaveRecord` and hands it to an `ItemStore`. Storage failures are
//! opaque to the core and are not retried.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, warn};
use validator::validate_length;

use crate::config::EngineConfig;
use crate::interface::{ItemStore, SaveRecord, StoreError};
use crate::models::CanonicalRecord;

/// Builder for a save: record plus what the user typed and picked
#[derive(Debug, Clone)]
pub struct SaveRequest {
    record: CanonicalRecord,
    title: String,
    library_id: Option<String>,
    screenshot_url: Option<String>,
}

impl SaveRequest {
    pub fn new(record: &CanonicalRecord) -> Self {
        Self {
            record: record.clone(),
            title: String::new(),
            library_id: None,
            screenshot_url: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn library(mut self, library_id: impl Into<String>) -> Self {
        self.library_id = Some(library_id.into());
        self
    }

    pub fn screenshot(mut self, screenshot_url: impl Into<String>) -> Self {
        self.screenshot_url = Some(screenshot_url.into());
        self
    }

    /// Check the form and produce the record handed to storage
    pub fn validate(self, config: &EngineConfig) -> Result<SaveRecord, StoreError> {
        let title = self.title.trim();
        if !validate_length(title, Some(1), None, None) {
            return Err(StoreError::Validation("Title is required".into()));
        }
        // Length is counted in characters, not bytes
        if !validate_length(title, None, Some(config.max_title_chars as u64), None) {
            return Err(StoreError::Validation(format!(
                "Title must be at most {} characters",
                config.max_title_chars
            )));
        }

        let Some(library_id) = self
            .library_id
            .filter(|id| validate_length(id.trim(), Some(1), None, None))
        else {
            return Err(StoreError::NoLibrary);
        };

        Ok(SaveRecord {
            title: title.to_string(),
            content: self.record.content,
            content_type: self.record.content_type,
            screenshot_url: self.screenshot_url.filter(|url| !url.trim().is_empty()),
            library_id,
        })
    }
}

/// Validate and save in one step
pub async fn save_item(
    store: &dyn ItemStore,
    request: SaveRequest,
    config: &EngineConfig,
) -> Result<(), StoreError> {
    let record = request.validate(config)?;
    let library_id = record.library_id.clone();
    match store.save(record).await {
        Ok(()) => {
            debug!(library_id = %library_id, "saved clipboard item");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, library_id = %library_id, "saving clipboard item failed");
            Err(e)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IN-MEMORY STORE
// ─────────────────────────────────────────────────────────────────────────────

/// A record accepted by `MemoryItemStore`
#[derive(Debug, Clone, PartialEq)]
pub struct SavedItem {
    pub id: i64,
    pub record: SaveRecord,
    pub saved_at: DateTime<Utc>,
}

/// `ItemStore` kept in memory (offline mode, tests).
/// `fail_next` queues an error for the next save.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    items: Mutex<Vec<SavedItem>>,
    next_error: Mutex<Option<StoreError>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, error: StoreError) {
        *self.next_error.lock() = Some(error);
    }

    pub fn items(&self) -> Vec<SavedItem> {
        self.items.lock().clone()
    }

    /// Items saved to one library, newest first
    pub fn items_in_library(&self, library_id: &str) -> Vec<SavedItem> {
        let mut items: Vec<SavedItem> = self
            .items
            .lock()
            .iter()
            .filter(|item| item.record.library_id == library_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then(b.id.cmp(&a.id)));
        items
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn save(&self, record: SaveRecord) -> Result<(), StoreError> {
        if let Some(error) = self.next_error.lock().take() {
            return Err(error);
        }
        let mut items = self.items.lock();
        let id = items.len() as i64 + 1;
        items.push(SavedItem {
            id,
            record,
            saved_at: Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    fn record() -> CanonicalRecord {
        CanonicalRecord::new(r#"{"classes":["btn"]}"#, "application/json")
    }

    #[test]
    fn test_validate_ok() {
        let saved = SaveRequest::new(&record())
            .title("  Button  ")
            .library("lib-1")
            .screenshot("data:image/png;base64,AAAA")
            .validate(&EngineConfig::default())
            .unwrap();
        assert_eq!(saved.title, "Button");
        assert_eq!(saved.content_type, "application/json");
        assert_eq!(saved.library_id, "lib-1");
        assert_eq!(saved.screenshot_url.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_title_required() {
        let err = SaveRequest::new(&record())
            .title("   ")
            .library("lib-1")
            .validate(&EngineConfig::default())
            .unwrap_err();
        assert_eq!(err, StoreError::Validation("Title is required".into()));
    }

    #[test]
    fn test_title_too_long() {
        let err = SaveRequest::new(&record())
            .title("x".repeat(101))
            .library("lib-1")
            .validate(&EngineConfig::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // exactly at the limit is fine
        assert!(SaveRequest::new(&record())
            .title("x".repeat(100))
            .library("lib-1")
            .validate(&EngineConfig::default())
            .is_ok());
    }

    #[test]
    fn test_title_limit_counts_characters() {
        let config = EngineConfig::default();
        assert!(SaveRequest::new(&record())
            .title("é".repeat(100))
            .library("lib-1")
            .validate(&config)
            .is_ok());
        assert!(SaveRequest::new(&record())
            .title("é".repeat(101))
            .library("lib-1")
            .validate(&config)
            .is_err());
    }

    #[test]
    fn test_blank_library_rejected() {
        let err = SaveRequest::new(&record())
            .title("t")
            .library("  ")
            .validate(&EngineConfig::default())
            .unwrap_err();
        assert_eq!(err, StoreError::NoLibrary);
    }

    #[test]
    fn test_library_required() {
        let err = SaveRequest::new(&record())
            .title("t")
            .validate(&EngineConfig::default())
            .unwrap_err();
        assert_eq!(err, StoreError::NoLibrary);
    }

    #[test]
    fn test_blank_screenshot_dropped() {
        let saved = SaveRequest::new(&record())
            .title("t")
            .library("lib-1")
            .screenshot(" ")
            .validate(&EngineConfig::default())
            .unwrap();
        assert_eq!(saved.screenshot_url, None);
    }

    #[test]
    fn test_save_item_roundtrip() {
        let rt = runtime();
        let store = MemoryItemStore::new();
        let request = SaveRequest::new(&record()).title("t").library("lib-1");
        rt.block_on(save_item(&store, request, &EngineConfig::default()))
            .unwrap();

        let items = store.items_in_library("lib-1");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].record.content, r#"{"classes":["btn"]}"#);
        assert!(store.items_in_library("lib-2").is_empty());
    }

    #[test]
    fn test_save_failure_propagates() {
        let rt = runtime();
        let store = MemoryItemStore::new();
        store.fail_next(StoreError::AuthenticationRequired);
        let request = SaveRequest::new(&record()).title("t").library("lib-1");
        let err = rt
            .block_on(save_item(&store, request.clone(), &EngineConfig::default()))
            .unwrap_err();
        assert_eq!(err, StoreError::AuthenticationRequired);
        assert!(store.items().is_empty());

        // the queued error is consumed
        rt.block_on(save_item(&store, request, &EngineConfig::default()))
            .unwrap();
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn test_invalid_request_never_reaches_store() {
        let rt = runtime();
        let store = MemoryItemStore::new();
        let request = SaveRequest::new(&record()).library("lib-1");
        assert!(rt
            .block_on(save_item(&store, request, &EngineConfig::default()))
            .is_err());
        assert!(store.items().is_empty());
    }
}
