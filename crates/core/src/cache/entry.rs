//! Cache entry and document types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted cache document: request key to entry.
pub type CacheMap = BTreeMap<String, CacheEntry>;

/// A cached upstream response.
///
/// `payload` is the raw response body exactly as received, so serving it
/// back is byte-identical to what the upstream sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub stored_at: DateTime<Utc>,
    pub payload: String,
}

impl CacheEntry {
    pub fn new(payload: impl Into<String>, stored_at: DateTime<Utc>) -> Self {
        Self { stored_at, payload: payload.into() }
    }

    /// Entry stamped with the current time.
    pub fn now(payload: impl Into<String>) -> Self {
        Self::new(payload, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serializes_camel_case() {
        let stored_at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z").unwrap().with_timezone(&Utc);
        let entry = CacheEntry::new(r#"{"data":[]}"#, stored_at);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["storedAt"], "2024-05-01T12:00:00Z");
        assert_eq!(json["payload"], r#"{"data":[]}"#);
    }

    #[test]
    fn test_payload_is_kept_as_text() {
        let raw = "{\"data\": [ {\"paperId\": \"p1\", \"title\": \"Caf\u{e9}\"} ] }\n";
        let entry = CacheEntry::now(raw);
        let json = serde_json::to_string(&entry).unwrap();
        let back: CacheEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.payload, raw);
    }
}
