//! Shared test helpers: stub providers and a small reference table.

use medimind_core::error::ProviderError;
use medimind_core::provider::{GenerationRequest, GenerationResponse, Provider, Usage};
use medimind_core::reference::{Interaction, Medication, ReferenceData, SymptomInfo};
use std::sync::Mutex;

/// Replies with scripted texts in order and records every request.
///
/// Once the script runs out the last reply repeats.
pub struct ScriptedProvider {
    replies: Vec<String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedProvider {
    pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn single(text: &str) -> Self {
        Self::new([text])
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len().min(self.replies.len().saturating_sub(1));
        requests.push(request);
        let text = self.replies.get(index).cloned().unwrap_or_default();
        Ok(GenerationResponse {
            text,
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
        })
    }
}

/// Always fails with a network error.
pub struct FailingProvider;

#[async_trait::async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        Err(ProviderError::Network("connection refused".into()))
    }
}

fn med(name: &str) -> Medication {
    Medication {
        name: name.into(),
        details: serde_json::Map::new(),
    }
}

fn interaction(drug1: &str, drug2: &str, severity: &str) -> Interaction {
    Interaction {
        drug1: drug1.into(),
        drug2: drug2.into(),
        severity: severity.into(),
        description: format!("{drug1} and {drug2} interact"),
        recommendation: "Ask your pharmacist before combining".into(),
    }
}

pub fn sample_reference() -> ReferenceData {
    ReferenceData {
        medications: vec![med("Aspirin"), med("Ibuprofen"), med("Warfarin"), med("Metformin")],
        interactions: vec![
            interaction("Aspirin", "Ibuprofen", "moderate"),
            interaction("Warfarin", "Aspirin", "major"),
        ],
        symptoms: vec![
            SymptomInfo {
                name: "headache".into(),
                questions: vec![
                    "Where is the pain located?".into(),
                    "How severe is it on a scale of 1-10?".into(),
                    "When did it start?".into(),
                    "Is it constant or does it come and go?".into(),
                    "Have you taken anything for it?".into(),
                    "Any sensitivity to light?".into(),
                ],
            },
            SymptomInfo {
                name: "nausea".into(),
                questions: vec!["Have you vomited?".into()],
            },
        ],
    }
}
