//! Session state: the bounded, in-process conversation buffer.
//!
//! Holds the conversation turns plus the medications, symptoms and health
//! concerns surfaced during one process lifetime. Nothing here is persisted;
//! the memory bank takes a [`SessionSnapshot`] when asked to save.

use chrono::Utc;
use medimind_core::message::{Message, Role};
use medimind_core::session::{COMPACTION_MARGIN, DEFAULT_MAX_HISTORY, SessionSnapshot};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SessionState {
    state: SessionSnapshot,
    max_history: usize,
    /// Symptoms and medications already handed to the memory bank
    saved_symptoms: usize,
    saved_medications: usize,
}

impl SessionState {
    /// Create an empty session keeping at most `max_history` messages.
    ///
    /// Values not above the compaction margin are raised to `margin + 1` so
    /// compaction always keeps at least one message.
    pub fn new(max_history: usize) -> Self {
        let mut session = Self {
            state: SessionSnapshot::default(),
            max_history: max_history.max(COMPACTION_MARGIN + 1),
            saved_symptoms: 0,
            saved_medications: 0,
        };
        session.stamp();
        session
    }

    fn stamp(&mut self) {
        let metadata = &mut self.state.metadata;
        metadata.insert("session_id".into(), Uuid::new_v4().to_string().into());
        metadata.insert("started_at".into(), Utc::now().to_rfc3339().into());
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Messages kept after a compaction.
    pub fn retention_target(&self) -> usize {
        self.max_history - COMPACTION_MARGIN
    }

    pub fn session_id(&self) -> Option<&str> {
        self.state.metadata.get("session_id").and_then(|v| v.as_str())
    }

    /// Append a turn, compacting when the history grows past the maximum.
    pub fn append_message(&mut self, role: Role, text: impl Into<String>) {
        self.state.conversation_history.push(Message::new(role, text));
        debug!(role = %role, len = self.state.conversation_history.len(), "Message appended");
        if self.state.conversation_history.len() > self.max_history {
            self.compact();
        }
    }

    /// Drop the oldest messages, keeping the most recent `max_history - 5`.
    pub fn compact(&mut self) {
        let keep = self.retention_target();
        let history = &mut self.state.conversation_history;
        if history.len() > keep {
            let dropped = history.len() - keep;
            history.drain(..dropped);
            info!(kept = keep, dropped, "Conversation history compacted");
        }
    }

    /// Returns `true` if the medication was not already recorded.
    pub fn add_medication(&mut self, name: &str) -> bool {
        let added = add_unique(&mut self.state.user_medications, name);
        if added {
            info!(medication = name, "Medication added to session");
        }
        added
    }

    /// Returns `true` if the symptom was not already recorded.
    pub fn add_symptom(&mut self, name: &str) -> bool {
        let added = add_unique(&mut self.state.symptoms_discussed, name);
        if added {
            info!(symptom = name, "Symptom added to session");
        }
        added
    }

    pub fn add_health_concern(&mut self, concern: &str) -> bool {
        add_unique(&mut self.state.health_concerns, concern)
    }

    /// An independent copy of the current state.
    pub fn get_context(&self) -> SessionSnapshot {
        self.state.clone()
    }

    pub fn conversation_history(&self) -> &[Message] {
        &self.state.conversation_history
    }

    pub fn medications(&self) -> &[String] {
        &self.state.user_medications
    }

    pub fn symptoms(&self) -> &[String] {
        &self.state.symptoms_discussed
    }

    pub fn health_concerns(&self) -> &[String] {
        &self.state.health_concerns
    }

    pub fn has_health_data(&self) -> bool {
        self.state.has_health_data()
    }

    /// What still needs saving: `None` when nothing was added since the
    /// last [`mark_saved`](Self::mark_saved).
    ///
    /// Only the symptoms added since then are included, so saving the same
    /// discussion twice does not repeat them in the symptom history.
    pub fn unsaved(&self) -> Option<SessionSnapshot> {
        let symptoms = &self.state.symptoms_discussed;
        if symptoms.len() == self.saved_symptoms
            && self.state.user_medications.len() == self.saved_medications
        {
            return None;
        }
        let mut snapshot = self.state.clone();
        snapshot.symptoms_discussed = symptoms[self.saved_symptoms..].to_vec();
        Some(snapshot)
    }

    /// Record that everything collected so far has been persisted.
    pub fn mark_saved(&mut self) {
        self.saved_symptoms = self.state.symptoms_discussed.len();
        self.saved_medications = self.state.user_medications.len();
    }

    /// Reset to an empty session with a fresh id.
    pub fn clear(&mut self) {
        self.state = SessionSnapshot::default();
        self.saved_symptoms = 0;
        self.saved_medications = 0;
        self.stamp();
        info!("Session cleared");
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

fn add_unique(list: &mut Vec<String>, value: &str) -> bool {
    if value.is_empty() || list.iter().any(|v| v == value) {
        return false;
    }
    list.push(value.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_one_appends_keep_fifteen_most_recent() {
        let mut session = SessionState::new(20);
        for i in 0..21 {
            session.append_message(Role::User, format!("message {i}"));
        }

        let history = session.conversation_history();
        assert_eq!(history.len(), 15);
        assert_eq!(history[0].text, "message 6");
        assert_eq!(history[14].text, "message 20");
    }

    #[test]
    fn no_compaction_at_exactly_max() {
        let mut session = SessionState::new(20);
        for i in 0..20 {
            session.append_message(Role::Model, format!("m{i}"));
        }
        assert_eq!(session.conversation_history().len(), 20);
    }

    #[test]
    fn history_never_exceeds_max() {
        let mut session = SessionState::new(8);
        for i in 0..50 {
            session.append_message(Role::User, format!("m{i}"));
            assert!(session.conversation_history().len() <= 8);
        }
        assert_eq!(session.conversation_history().last().unwrap().text, "m49");
    }

    #[test]
    fn tiny_max_is_raised_above_margin() {
        let session = SessionState::new(3);
        assert_eq!(session.max_history(), COMPACTION_MARGIN + 1);
        assert_eq!(session.retention_target(), 1);
    }

    #[test]
    fn ordered_sets_ignore_duplicates() {
        let mut session = SessionState::default();
        assert!(session.add_medication("aspirin"));
        assert!(session.add_medication("ibuprofen"));
        assert!(!session.add_medication("aspirin"));
        assert!(session.add_symptom("headache"));
        assert!(!session.add_symptom("headache"));
        assert!(session.add_health_concern("chest pain"));

        assert_eq!(session.medications(), ["aspirin", "ibuprofen"]);
        assert_eq!(session.symptoms(), ["headache"]);
        assert_eq!(session.health_concerns(), ["chest pain"]);
        assert!(session.has_health_data());
    }

    #[test]
    fn snapshot_is_independent() {
        let mut session = SessionState::default();
        session.add_medication("aspirin");
        let snapshot = session.get_context();

        session.add_medication("warfarin");
        session.append_message(Role::User, "hello");

        assert_eq!(snapshot.user_medications, vec!["aspirin"]);
        assert!(snapshot.conversation_history.is_empty());
    }

    #[test]
    fn clear_resets_and_renews_id() {
        let mut session = SessionState::default();
        let first_id = session.session_id().unwrap().to_string();
        session.add_symptom("nausea");
        session.append_message(Role::User, "hi");

        session.clear();

        assert!(session.conversation_history().is_empty());
        assert!(!session.has_health_data());
        assert_ne!(session.session_id().unwrap(), first_id);
    }

    #[test]
    fn compact_is_idempotent_at_retention_target() {
        let mut s = SessionState::new(20);
        for i in 0..21 {
            s.append_message(Role::User, format!("m{i}"));
        }
        assert_eq!(s.conversation_history().len(), 15);

        s.compact();
        let once = s.conversation_history().to_vec();
        s.compact();
        assert_eq!(s.conversation_history(), once.as_slice());
        assert_eq!(once.len(), 15);
        assert_eq!(once[0].text, "m6");
    }

    #[test]
    fn compact_below_target_is_a_no_op() {
        let mut s = SessionState::new(20);
        for i in 0..3 {
            s.append_message(Role::Model, format!("m{i}"));
        }
        let before = s.conversation_history().to_vec();
        s.compact();
        assert_eq!(s.conversation_history(), before.as_slice());
    }

    #[test]
    fn unsaved_tracks_new_symptoms_only() {
        let mut s = SessionState::new(20);
        assert!(s.unsaved().is_none());

        s.add_symptom("headache");
        s.add_medication("aspirin");
        let pending = s.unsaved().unwrap();
        assert_eq!(pending.symptoms_discussed, ["headache"]);
        assert_eq!(pending.user_medications, ["aspirin"]);

        s.mark_saved();
        assert!(s.unsaved().is_none());

        s.add_symptom("nausea");
        let pending = s.unsaved().unwrap();
        assert_eq!(pending.symptoms_discussed, ["nausea"]);
        assert_eq!(pending.user_medications, ["aspirin"]);

        s.mark_saved();
        s.clear();
        assert!(s.unsaved().is_none());
        s.add_symptom("fever");
        assert_eq!(s.unsaved().unwrap().symptoms_discussed, ["fever"]);
    }
}
