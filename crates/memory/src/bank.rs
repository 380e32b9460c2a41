//! The Memory Bank: durable, per-user accumulation of health history.
//!
//! The full all-users document is held in memory; every mutation rewrites
//! the whole document through the store. No locking: two processes sharing
//! a file can lose each other's updates (last writer wins).

use chrono::Utc;
use medimind_core::error::MemoryError;
use medimind_core::record::{DoctorVisit, MemoryDocument, MemoryRecord, SymptomEntry};
use medimind_core::session::SessionSnapshot;
use medimind_core::store::MemoryStore;
use std::sync::Arc;
use tracing::{info, warn};

pub struct MemoryBank {
    user_id: String,
    store: Arc<dyn MemoryStore>,
    memory: MemoryDocument,
}

impl MemoryBank {
    /// Read the document from `store` and make sure `user_id` has a record.
    ///
    /// An absent or unreadable document is treated as empty. A record for an
    /// unseen user is created in memory only; it reaches storage on the next
    /// save.
    pub fn load(store: Arc<dyn MemoryStore>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let mut memory = match store.load() {
            Ok(doc) => doc.unwrap_or_default(),
            Err(e) => {
                warn!(store = store.name(), error = %e, "Memory document unreadable, starting empty");
                MemoryDocument::new()
            }
        };
        memory
            .entry(user_id.clone())
            .or_insert_with(MemoryRecord::new);

        info!(user_id = %user_id, store = store.name(), "Memory bank initialized");
        Self {
            user_id,
            store,
            memory,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn record_mut(&mut self) -> &mut MemoryRecord {
        self.memory
            .entry(self.user_id.clone())
            .or_insert_with(MemoryRecord::new)
    }

    fn persist(&self) -> Result<(), MemoryError> {
        self.store.save(&self.memory)
    }

    /// Fold a session into the user's record and rewrite the document.
    ///
    /// Medications are unioned keeping existing order. Every discussed
    /// symptom is appended with a fresh timestamp, repeats included.
    pub fn save_session(&mut self, session: &SessionSnapshot) -> Result<(), MemoryError> {
        let now = Utc::now();
        let record = self.record_mut();

        for med in &session.user_medications {
            if !record.medications.contains(med) {
                record.medications.push(med.clone());
            }
        }

        record
            .symptom_history
            .extend(session.symptoms_discussed.iter().map(|s| SymptomEntry {
                symptom: s.clone(),
                timestamp: now,
            }));

        self.persist()?;
        info!(
            user_id = %self.user_id,
            medications = session.user_medications.len(),
            symptoms = session.symptoms_discussed.len(),
            "Session saved to memory bank"
        );
        Ok(())
    }

    /// Add a chronic condition if not already recorded, then persist.
    ///
    /// Returns whether the condition was new.
    pub fn add_chronic_condition(&mut self, condition: &str) -> Result<bool, MemoryError> {
        let condition = condition.trim();
        let record = self.record_mut();
        if condition.is_empty() || record.chronic_conditions.iter().any(|c| c == condition) {
            return Ok(false);
        }
        record.chronic_conditions.push(condition.to_string());
        self.persist()?;
        Ok(true)
    }

    /// Append a doctor visit note with the current time, then persist.
    pub fn record_doctor_visit(&mut self, notes: &str) -> Result<(), MemoryError> {
        let visit = DoctorVisit {
            notes: notes.to_string(),
            timestamp: Utc::now(),
        };
        self.record_mut().doctor_visits.push(visit);
        self.persist()
    }

    pub fn get_user_history(&self) -> Option<&MemoryRecord> {
        self.memory.get(&self.user_id)
    }

    pub fn get_medications(&self) -> &[String] {
        self.get_user_history()
            .map(|r| r.medications.as_slice())
            .unwrap_or_default()
    }

    pub fn get_symptom_patterns(&self) -> &[SymptomEntry] {
        self.get_user_history()
            .map(|r| r.symptom_history.as_slice())
            .unwrap_or_default()
    }
}
