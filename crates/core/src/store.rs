//! MemoryStore trait: durable storage for the all-users memory document.
//!
//! Stores read and write the whole document at once. There is no locking
//! or versioning; two processes sharing a store overwrite each other
//! (last writer wins).

use crate::error::MemoryError;
use crate::record::MemoryDocument;

/// Whole-document persistence for the memory bank.
///
/// Implementations: JSON file, in-memory (for testing).
pub trait MemoryStore: Send + Sync {
    /// The store name (e.g., "file", "in_memory").
    fn name(&self) -> &str;

    /// Read the persisted document. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> std::result::Result<Option<MemoryDocument>, MemoryError>;

    /// Replace the persisted document with `document`.
    fn save(&self, document: &MemoryDocument) -> std::result::Result<(), MemoryError>;
}
