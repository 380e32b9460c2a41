//! File-based memory store: one pretty-printed JSON document.
//!
//! The whole mapping of all users is read at once and rewritten at once.
//! Writes go to a sibling temp file which is then renamed over the target,
//! so a reader never observes a half-written document.
//!
//! Default location: `data/memory_bank.json`

use medimind_core::error::MemoryError;
use medimind_core::record::MemoryDocument;
use medimind_core::store::MemoryStore;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A file-backed memory store.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "memory_bank.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl MemoryStore for JsonFileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn load(&self) -> Result<Option<MemoryDocument>, MemoryError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(MemoryError::Storage(format!(
                    "Failed to read memory file {}: {e}",
                    self.path.display()
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let document: MemoryDocument = serde_json::from_str(&content)
            .map_err(|e| MemoryError::Encode(format!("{}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), users = document.len(), "Memory document loaded");
        Ok(Some(document))
    }

    fn save(&self, document: &MemoryDocument) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                MemoryError::Storage(format!("Failed to create memory directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(document)
            .map_err(|e| MemoryError::Encode(e.to_string()))?;

        let tmp = self.temp_path();
        std::fs::write(&tmp, content.as_bytes()).map_err(|e| {
            MemoryError::Storage(format!("Failed to write memory file: {e}"))
        })?;

        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            if let Err(cleanup) = std::fs::remove_file(&tmp) {
                warn!(error = %cleanup, "Could not remove temporary memory file");
            }
            return Err(MemoryError::Storage(format!(
                "Failed to replace memory file: {e}"
            )));
        }

        debug!(path = %self.path.display(), users = document.len(), "Memory document saved");
        Ok(())
    }
}
