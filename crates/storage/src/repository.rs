use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tutor_core::model::{CompletionRecord, ProgressPointer};

/// Key under which learner progress is stored.
pub const PROGRESS_KEY: &str = "progress";

/// Current encoding version of [`ProgressRecord`].
pub const PROGRESS_RECORD_VERSION: u32 = 1;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Persisted shape of learner progress: pointer plus completed lessons.
///
/// Mirrors the domain types so the services layer never sees the encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub version: u32,
    pub group: u32,
    pub lesson: u32,
    #[serde(default)]
    pub completed: Vec<(u32, u32)>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_state(
        pointer: ProgressPointer,
        completion: &CompletionRecord,
        saved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            version: PROGRESS_RECORD_VERSION,
            group: pointer.group(),
            lesson: pointer.lesson(),
            completed: completion
                .iter()
                .map(|done| (done.group(), done.lesson()))
                .collect(),
            saved_at: Some(saved_at),
        }
    }

    /// Convert the record back into domain state.
    ///
    /// The pointer is returned as stored; callers are expected to resolve it
    /// against the current catalog.
    #[must_use]
    pub fn into_state(self) -> (ProgressPointer, CompletionRecord) {
        let pointer = ProgressPointer::new(self.group, self.lesson);
        let completion = self
            .completed
            .into_iter()
            .map(|(group, lesson)| ProgressPointer::new(group, lesson))
            .collect();
        (pointer, completion)
    }

    /// Encode as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails.
    pub fn encode(&self) -> Result<Vec<u8>, StorageError> {
        serde_json::to_vec(self).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Decode from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed bytes or an
    /// unsupported version.
    pub fn decode(bytes: &[u8]) -> Result<Self, StorageError> {
        let record: Self = serde_json::from_slice(bytes)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        if record.version != PROGRESS_RECORD_VERSION {
            return Err(StorageError::Serialization(format!(
                "unsupported progress record version {}",
                record.version
            )));
        }
        Ok(record)
    }
}

//
// ─── KEY-VALUE CONTRACT ────────────────────────────────────────────────────────
//

/// Minimal persisted-storage capability.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Storage backend behind a trait object for easy swapping.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        Self { kv }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::time::fixed_now;

    fn sample_completion() -> CompletionRecord {
        [ProgressPointer::new(1, 1), ProgressPointer::new(1, 2)]
            .into_iter()
            .collect()
    }

    #[test]
    fn record_round_trips_domain_state() {
        let pointer = ProgressPointer::new(2, 3);
        let record = ProgressRecord::from_state(pointer, &sample_completion(), fixed_now());
        let decoded = ProgressRecord::decode(&record.encode().unwrap()).unwrap();
        assert_eq!(decoded, record);

        let (restored, completion) = decoded.into_state();
        assert_eq!(restored, pointer);
        assert_eq!(completion, sample_completion());
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = ProgressRecord::decode(b"{not json").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn decode_rejects_unknown_version() {
        let err = ProgressRecord::decode(br#"{"version":9,"group":1,"lesson":1}"#).unwrap_err();
        assert!(err.to_string().contains("version 9"));
    }

    #[test]
    fn decode_tolerates_missing_optional_fields() {
        let record = ProgressRecord::decode(br#"{"version":1,"group":3,"lesson":2}"#).unwrap();
        let (pointer, completion) = record.into_state();
        assert_eq!(pointer, ProgressPointer::new(3, 2));
        assert!(completion.is_empty());
    }

    #[tokio::test]
    async fn in_memory_store_sets_gets_and_removes() {
        let store = InMemoryStore::new();
        assert!(store.get(PROGRESS_KEY).await.unwrap().is_none());

        store.set(PROGRESS_KEY, b"one").await.unwrap();
        store.set(PROGRESS_KEY, b"two").await.unwrap();
        assert_eq!(store.get(PROGRESS_KEY).await.unwrap().as_deref(), Some(&b"two"[..]));

        store.remove(PROGRESS_KEY).await.unwrap();
        store.remove(PROGRESS_KEY).await.unwrap();
        assert!(store.get(PROGRESS_KEY).await.unwrap().is_none());
    }
}
