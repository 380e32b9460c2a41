//! In-memory store: useful for testing and ephemeral sessions.

use medimind_core::error::MemoryError;
use medimind_core::record::MemoryDocument;
use medimind_core::store::MemoryStore;
use std::sync::Mutex;

/// Holds the last saved document in process memory.
#[derive(Default)]
pub struct InMemoryStore {
    document: Mutex<Option<MemoryDocument>>,
    saves: Mutex<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an already-persisted document.
    pub fn with_document(document: MemoryDocument) -> Self {
        Self {
            document: Mutex::new(Some(document)),
            saves: Mutex::new(0),
        }
    }

    /// The most recently saved document.
    pub fn snapshot(&self) -> Option<MemoryDocument> {
        self.document.lock().ok().and_then(|d| d.clone())
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }
}

impl MemoryStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn load(&self) -> Result<Option<MemoryDocument>, MemoryError> {
        let guard = self
            .document
            .lock()
            .map_err(|e| MemoryError::Storage(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, document: &MemoryDocument) -> Result<(), MemoryError> {
        *self
            .document
            .lock()
            .map_err(|e| MemoryError::Storage(e.to_string()))? = Some(document.clone());
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medimind_core::record::MemoryRecord;

    #[test]
    fn starts_empty() {
        let store = InMemoryStore::new();
        assert!(store.load().unwrap().is_none());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn save_replaces_document() {
        let store = InMemoryStore::new();
        let mut doc = MemoryDocument::new();
        doc.insert("u1".into(), MemoryRecord::new());
        store.save(&doc).unwrap();
        store.save(&MemoryDocument::new()).unwrap();

        assert!(store.load().unwrap().unwrap().is_empty());
        assert_eq!(store.save_count(), 2);
    }
}
