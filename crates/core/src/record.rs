//! Long-term memory records.
//!
//! The persisted document is one JSON object whose keys are user ids and
//! whose values are [`MemoryRecord`]s.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// The whole persisted mapping of all users.
pub type MemoryDocument = BTreeMap<String, MemoryRecord>;

/// Everything remembered about one user across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Medications ever mentioned, first-seen order, no duplicates
    #[serde(default)]
    pub medications: Vec<String>,

    /// Chronic conditions, first-seen order, no duplicates
    #[serde(default)]
    pub chronic_conditions: Vec<String>,

    /// Every symptom ever discussed; repeats accumulate
    #[serde(default)]
    pub symptom_history: Vec<SymptomEntry>,

    /// Recorded doctor visits, oldest first
    #[serde(default)]
    pub doctor_visits: Vec<DoctorVisit>,

    /// When the record was first synthesized
    #[serde(default = "Utc::now", deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl MemoryRecord {
    /// A fresh, empty record stamped with the current time.
    pub fn new() -> Self {
        Self {
            medications: Vec::new(),
            chronic_conditions: Vec::new(),
            symptom_history: Vec::new(),
            doctor_visits: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

impl Default for MemoryRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// One discussed symptom with the time it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomEntry {
    pub symptom: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// A doctor visit note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorVisit {
    pub notes: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Parse an ISO-8601 timestamp with or without a UTC offset.
///
/// Timestamps without an offset (`2025-03-01T10:00:00.123456`) are taken
/// as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}
