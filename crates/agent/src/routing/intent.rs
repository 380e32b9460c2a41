//! Intent router: picks the agent category with the most keyword hits.

use super::lexicon::Lexicon;
use medimind_core::Intent;
use tracing::debug;

pub const SYMPTOM_KEYWORDS: [&str; 12] = [
    "pain", "hurt", "ache", "feel", "sick", "symptom", "headache", "fever", "tired", "fatigue",
    "dizzy", "nausea",
];

pub const MEDICATION_KEYWORDS: [&str; 12] = [
    "medication",
    "medicine",
    "drug",
    "pill",
    "prescription",
    "aspirin",
    "ibuprofen",
    "acetaminophen",
    "take",
    "taking",
    "dose",
    "dosage",
];

pub const DOCTOR_PREP_KEYWORDS: [&str; 7] = [
    "doctor",
    "appointment",
    "visit",
    "prepare",
    "summary",
    "questions to ask",
    "see my doctor",
];

/// Classifies free text into an [`Intent`].
///
/// Categories are scored in the order symptom, medication, doctor_prep.
/// The highest count wins and ties go to the earlier category. No hits at
/// all routes to [`Intent::General`].
#[derive(Debug, Clone)]
pub struct IntentRouter {
    lexicon: Lexicon<Intent>,
}

impl IntentRouter {
    pub fn new(lexicon: Lexicon<Intent>) -> Self {
        Self { lexicon }
    }

    pub fn scores(&self, text: &str) -> Vec<(Intent, usize)> {
        self.lexicon.score(text)
    }

    pub fn classify(&self, text: &str) -> Intent {
        let scores = self.scores(text);
        let mut best = (Intent::General, 0);
        for (intent, score) in scores {
            if score > best.1 {
                best = (intent, score);
            }
        }
        debug!(intent = %best.0, score = best.1, "Intent classified");
        best.0
    }

    pub fn lexicon(&self) -> &Lexicon<Intent> {
        &self.lexicon
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new(
            Lexicon::new()
                .with_category(Intent::Symptom, SYMPTOM_KEYWORDS)
                .with_category(Intent::Medication, MEDICATION_KEYWORDS)
                .with_category(Intent::DoctorPrep, DOCTOR_PREP_KEYWORDS),
        )
    }
}
