//! Routing intents.

use serde::{Deserialize, Serialize};

/// The routing category chosen for a user message.
///
/// Derived per message by the intent router; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Symptom,
    Medication,
    DoctorPrep,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Symptom => "symptom",
            Self::Medication => "medication",
            Self::DoctorPrep => "doctor_prep",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde_name() {
        let json = serde_json::to_string(&Intent::DoctorPrep).unwrap();
        assert_eq!(json, "\"doctor_prep\"");
        assert_eq!(Intent::DoctorPrep.to_string(), "doctor_prep");
    }
}
