//! Engine configuration
//!
//! Limits are owned by the embedding application; everything has a default so
//! a partial JSON document is enough to override a single value.

use serde::{Deserialize, Serialize};

/// Tunable limits for extraction, saving and session history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest payload the extractor will read, in bytes
    pub max_payload_bytes: usize,

    /// Longest accepted item title, in characters
    pub max_title_chars: usize,

    /// Number of parsed captures a session remembers
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: 16 * 1024 * 1024, // 16MB
            max_title_chars: 100,
            history_limit: 50,
        }
    }
}

impl EngineConfig {
    /// Parse from JSON, filling anything missing with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json(r#"{"history_limit": 5}"#).unwrap();
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.max_title_chars, 100);
        assert_eq!(config.max_payload_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn test_rejects_wrong_types() {
        assert!(EngineConfig::from_json(r#"{"history_limit": "many"}"#).is_err());
    }
}
