//! Static reference data: known medications, interactions and symptoms.
//!
//! Loaded once at startup and never mutated. All name matching here is
//! case-insensitive substring containment, the same rule the router uses.

use serde::{Deserialize, Serialize};

/// A known medication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,

    /// Any further descriptive fields (class, common uses, ...)
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// A known adverse pairing between two medications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub drug1: String,
    pub drug2: String,
    pub severity: String,
    pub description: String,
    pub recommendation: String,
}

impl Interaction {
    /// Whether this entry describes the unordered pair `(a, b)`.
    pub fn involves(&self, a: &str, b: &str) -> bool {
        let (d1, d2) = (self.drug1.as_str(), self.drug2.as_str());
        (d1.eq_ignore_ascii_case(a) && d2.eq_ignore_ascii_case(b))
            || (d1.eq_ignore_ascii_case(b) && d2.eq_ignore_ascii_case(a))
    }
}

/// A known symptom and the clarifying questions worth asking about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomInfo {
    pub name: String,
    #[serde(default)]
    pub questions: Vec<String>,
}

/// The three reference tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(default)]
    pub symptoms: Vec<SymptomInfo>,
}

impl ReferenceData {
    /// Find the interaction for an unordered pair of medication names.
    pub fn find_interaction(&self, a: &str, b: &str) -> Option<&Interaction> {
        self.interactions.iter().find(|i| i.involves(a, b))
    }

    /// Known medication names contained in `text`, in reference order.
    pub fn extract_medications(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.medications
            .iter()
            .filter(|m| !m.name.is_empty() && lower.contains(&m.name.to_lowercase()))
            .map(|m| m.name.clone())
            .collect()
    }

    /// Known symptom names contained in `text`, in reference order.
    pub fn symptoms_in(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.symptoms
            .iter()
            .filter(|s| !s.name.is_empty() && lower.contains(&s.name.to_lowercase()))
            .map(|s| s.name.clone())
            .collect()
    }

    /// Clarifying questions for the first known symptom mentioned in `text`.
    pub fn questions_for(&self, text: &str, limit: usize) -> Vec<String> {
        let lower = text.to_lowercase();
        self.symptoms
            .iter()
            .find(|s| !s.name.is_empty() && lower.contains(&s.name.to_lowercase()))
            .map(|s| s.questions.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.medications.is_empty() && self.interactions.is_empty() && self.symptoms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn med(name: &str) -> Medication {
        Medication {
            name: name.into(),
            details: serde_json::Map::new(),
        }
    }

    fn sample() -> ReferenceData {
        ReferenceData {
            medications: vec![med("Aspirin"), med("Ibuprofen"), med("Warfarin")],
            interactions: vec![Interaction {
                drug1: "aspirin".into(),
                drug2: "ibuprofen".into(),
                severity: "moderate".into(),
                description: "Ibuprofen may reduce aspirin's cardioprotective effect".into(),
                recommendation: "Take aspirin at least 30 minutes before ibuprofen".into(),
            }],
            symptoms: vec![
                SymptomInfo {
                    name: "headache".into(),
                    questions: (1..=7).map(|i| format!("Question {i}?")).collect(),
                },
                SymptomInfo {
                    name: "nausea".into(),
                    questions: vec!["Any vomiting?".into()],
                },
            ],
        }
    }

    #[test]
    fn interaction_lookup_is_symmetric() {
        let data = sample();
        let forward = data.find_interaction("Aspirin", "Ibuprofen");
        let backward = data.find_interaction("ibuprofen", "ASPIRIN");
        assert!(forward.is_some());
        assert_eq!(forward, backward);
    }

    #[test]
    fn unknown_pair_is_absent() {
        let data = sample();
        assert!(data.find_interaction("aspirin", "warfarin").is_none());
    }

    #[test]
    fn extracts_medications_case_insensitively() {
        let data = sample();
        let found = data.extract_medications("I take ASPIRIN and some ibuprofen");
        assert_eq!(found, vec!["Aspirin", "Ibuprofen"]);
    }

    #[test]
    fn questions_come_from_first_match_and_are_capped() {
        let data = sample();
        let questions = data.questions_for("headache and nausea", 5);
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[0], "Question 1?");
    }

    #[test]
    fn symptoms_in_lists_every_match() {
        let data = sample();
        assert_eq!(data.symptoms_in("Headache with nausea"), vec!["headache", "nausea"]);
        assert!(data.symptoms_in("all good").is_empty());
    }

    #[test]
    fn medication_details_are_kept() {
        let m: Medication =
            serde_json::from_str(r#"{"name": "Aspirin", "class": "NSAID"}"#).unwrap();
        assert_eq!(m.name, "Aspirin");
        assert_eq!(m.details["class"], "NSAID");
    }
}
