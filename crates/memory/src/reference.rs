//! Loading of the static reference tables from JSON files.
//!
//! Each file wraps its list in a single key:
//! - `{"common_medications": [...]}`
//! - `{"drug_interactions": [...]}`
//! - `{"common_symptoms": [...]}`
//!
//! A missing or malformed file yields an empty table and a warning.

use medimind_core::reference::{Interaction, Medication, ReferenceData, SymptomInfo};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Deserialize)]
struct MedicationsFile {
    #[serde(default)]
    common_medications: Vec<Medication>,
}

#[derive(Deserialize)]
struct InteractionsFile {
    #[serde(default)]
    drug_interactions: Vec<Interaction>,
}

#[derive(Deserialize)]
struct SymptomsFile {
    #[serde(default)]
    common_symptoms: Vec<SymptomInfo>,
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Reference file unavailable");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(table) => Some(table),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Reference file malformed, ignoring");
            None
        }
    }
}

/// Load all three reference tables. Never fails.
pub fn load_reference_data(
    medications_path: &Path,
    interactions_path: &Path,
    symptoms_path: &Path,
) -> ReferenceData {
    let medications = read_table::<MedicationsFile>(medications_path)
        .map(|f| f.common_medications)
        .unwrap_or_default();
    let interactions = read_table::<InteractionsFile>(interactions_path)
        .map(|f| f.drug_interactions)
        .unwrap_or_default();
    let symptoms = read_table::<SymptomsFile>(symptoms_path)
        .map(|f| f.common_symptoms)
        .unwrap_or_default();

    debug!(
        medications = medications.len(),
        interactions = interactions.len(),
        symptoms = symptoms.len(),
        "Reference data loaded"
    );

    ReferenceData {
        medications,
        interactions,
        symptoms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_wrapped_tables() {
        let dir = tempfile::tempdir().unwrap();
        let meds = dir.path().join("medications.json");
        let inter = dir.path().join("interactions.json");
        let symp = dir.path().join("symptoms.json");
        std::fs::write(
            &meds,
            r#"{"common_medications": [{"name": "Aspirin", "class": "NSAID"}]}"#,
        )
        .unwrap();
        std::fs::write(
            &inter,
            r#"{"drug_interactions": [{"drug1": "aspirin", "drug2": "ibuprofen",
                "severity": "moderate", "description": "d", "recommendation": "r"}]}"#,
        )
        .unwrap();
        std::fs::write(
            &symp,
            r#"{"common_symptoms": [{"name": "headache", "questions": ["Where?"]}]}"#,
        )
        .unwrap();

        let data = load_reference_data(&meds, &inter, &symp);
        assert_eq!(data.medications[0].name, "Aspirin");
        assert!(data.find_interaction("Ibuprofen", "Aspirin").is_some());
        assert_eq!(data.questions_for("bad headache", 5), ["Where?"]);
    }

    #[test]
    fn missing_and_corrupt_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "not json").unwrap();

        let data = load_reference_data(&dir.path().join("nope.json"), &corrupt, &corrupt);
        assert!(data.is_empty());
    }
}
