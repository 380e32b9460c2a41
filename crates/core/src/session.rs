//! Session snapshot: the transient conversation state of one process.
//!
//! The mutable owner lives in `medimind-agent` (`SessionState`); this is
//! the plain data shape handed to agents and to the memory bank.

use serde::{Deserialize, Serialize};
use crate::message::Message;

/// Default maximum number of messages kept in a session.
pub const DEFAULT_MAX_HISTORY: usize = 20;

/// How many messages below the maximum compaction trims down to.
pub const COMPACTION_MARGIN: usize = 5;

/// An immutable copy of session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Ordered conversation turns
    #[serde(default)]
    pub conversation_history: Vec<Message>,

    /// Medications mentioned, first-seen order, no duplicates
    #[serde(default)]
    pub user_medications: Vec<String>,

    /// Symptoms discussed, first-seen order, no duplicates
    #[serde(default)]
    pub symptoms_discussed: Vec<String>,

    /// Free-form health concerns, first-seen order, no duplicates
    #[serde(default)]
    pub health_concerns: Vec<String>,

    /// Session-level metadata
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl SessionSnapshot {
    /// Whether the session holds anything worth persisting to long-term memory.
    pub fn has_health_data(&self) -> bool {
        !self.user_medications.is_empty() || !self.symptoms_discussed.is_empty()
    }
}
