//! Agent dispatch: one routed message in, one reply out.
//!
//! The dispatcher picks the agent bound to the intent, lets it enrich the
//! prompt, and makes exactly one generation call with the session history
//! as prior turns. Two paths skip the model:
//! - the symptom agent answers with a canned alert when an emergency
//!   keyword appears in the input
//! - a failed generation call is answered with a fixed apology
//!
//! Neither is surfaced as an error to the caller.

pub mod agents;
pub mod prompts;

pub use agents::{AGENTS, AgentFacts, AgentInfo, AgentSpec, VisitSummary, agent_for};

use crate::routing::first_match;
use agents::EnrichContext;
use medimind_config::AppConfig;
use medimind_core::intent::Intent;
use medimind_core::provider::{GenerationRequest, Provider, Usage};
use medimind_core::reference::ReferenceData;
use medimind_core::session::SessionSnapshot;
use medimind_telemetry::MetricsTracker;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Model parameters applied to every generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: Option<u32>,
}

impl GenerationSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.active_model().to_string(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: Some(config.max_tokens),
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// The outcome of one dispatched message.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    pub intent: Intent,
    /// Display name of the answering agent
    pub agent: &'static str,
    pub agent_key: &'static str,
    pub response: String,
    pub is_emergency: bool,
    pub facts: AgentFacts,
    /// The response is the apology text because generation failed
    pub generation_failed: bool,
    pub usage: Option<Usage>,
}

pub struct Dispatcher {
    provider: Arc<dyn Provider>,
    settings: GenerationSettings,
    reference: Arc<ReferenceData>,
    emergency_keywords: Vec<String>,
    metrics: Option<Arc<MetricsTracker>>,
}

impl Dispatcher {
    /// Uses the default emergency keyword list until overridden.
    pub fn new(
        provider: Arc<dyn Provider>,
        settings: GenerationSettings,
        reference: Arc<ReferenceData>,
    ) -> Self {
        Self {
            provider,
            settings,
            reference,
            emergency_keywords: medimind_config::SafetyConfig::default().emergency_keywords,
            metrics: None,
        }
    }

    pub fn with_emergency_keywords(mut self, keywords: Vec<String>) -> Self {
        self.emergency_keywords = keywords;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsTracker>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Answer `input` with the agent bound to `intent`.
    pub async fn dispatch(
        &self,
        intent: Intent,
        input: &str,
        session: &SessionSnapshot,
    ) -> DispatchResult {
        let started = Instant::now();
        let spec = agent_for(intent);
        let result = self.run(spec, intent, input, session).await;

        if let Some(metrics) = &self.metrics {
            metrics.track_request(spec.key, started.elapsed());
        }
        result
    }

    async fn run(
        &self,
        spec: &'static AgentSpec,
        intent: Intent,
        input: &str,
        session: &SessionSnapshot,
    ) -> DispatchResult {
        info!(agent = spec.name, intent = %intent, "Dispatching message");

        if spec.screens_emergencies {
            if let Some(keyword) = first_match(input, &self.emergency_keywords) {
                warn!(agent = spec.name, keyword, "Emergency keyword detected");
                if let Some(metrics) = &self.metrics {
                    metrics.track_emergency();
                }
                return DispatchResult {
                    intent,
                    agent: spec.name,
                    agent_key: spec.key,
                    response: prompts::EMERGENCY_MESSAGE.to_string(),
                    is_emergency: true,
                    facts: AgentFacts::Emergency {
                        keyword: keyword.to_string(),
                    },
                    generation_failed: false,
                    usage: None,
                };
            }
        }

        let enrichment = (spec.enrich)(&EnrichContext {
            input,
            session,
            reference: &self.reference,
        });

        if matches!(enrichment.facts, AgentFacts::Medication { .. }) {
            if let Some(metrics) = &self.metrics {
                metrics.track_interaction_check();
            }
        }

        let request = GenerationRequest {
            model: self.settings.model.clone(),
            system_instruction: spec.instruction.to_string(),
            history: session.conversation_history.clone(),
            prompt: enrichment.prompt,
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
            max_tokens: self.settings.max_tokens,
        };

        let (response, usage, generation_failed) = match self.provider.complete(request).await {
            Ok(resp) => (resp.text, resp.usage, false),
            Err(e) => {
                error!(agent = spec.name, provider = self.provider.name(), error = %e, "Generation failed");
                if let Some(metrics) = &self.metrics {
                    metrics.track_error("generation");
                }
                (prompts::APOLOGY_MESSAGE.to_string(), None, true)
            }
        };

        DispatchResult {
            intent,
            agent: spec.name,
            agent_key: spec.key,
            response,
            is_emergency: false,
            facts: enrichment.facts,
            generation_failed,
            usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FailingProvider, ScriptedProvider, sample_reference};
    use medimind_core::message::{Message, Role};

    fn dispatcher(provider: Arc<dyn Provider>) -> Dispatcher {
        Dispatcher::new(
            provider,
            GenerationSettings::default(),
            Arc::new(sample_reference()),
        )
    }

    #[tokio::test]
    async fn general_passes_raw_input_and_history() {
        let provider = Arc::new(ScriptedProvider::single("Hi! How can I help?"));
        let d = dispatcher(provider.clone());
        let session = SessionSnapshot {
            conversation_history: vec![Message::user("earlier"), Message::model("reply")],
            ..SessionSnapshot::default()
        };

        let result = d.dispatch(Intent::General, "Hello", &session).await;

        assert_eq!(result.response, "Hi! How can I help?");
        assert_eq!(result.agent, "Orchestrator");
        assert!(!result.is_emergency);
        assert!(!result.generation_failed);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, "Hello");
        assert_eq!(requests[0].history.len(), 2);
        assert_eq!(requests[0].history[1].role, Role::Model);
        assert_eq!(requests[0].system_instruction, prompts::ORCHESTRATOR_INSTRUCTION);
        assert_eq!(requests[0].model, "models/gemini-flash-latest");
    }

    #[tokio::test]
    async fn emergency_short_circuits_generation() {
        let provider = Arc::new(ScriptedProvider::single("should not be used"));
        let metrics = Arc::new(MetricsTracker::new());
        let d = dispatcher(provider.clone()).with_metrics(metrics.clone());

        let result = d
            .dispatch(Intent::Symptom, "I have severe chest pain", &SessionSnapshot::default())
            .await;

        assert!(result.is_emergency);
        assert_eq!(result.response, prompts::EMERGENCY_MESSAGE);
        assert_eq!(
            result.facts,
            AgentFacts::Emergency {
                keyword: "chest pain".into()
            }
        );
        assert_eq!(provider.call_count(), 0);
        assert_eq!(metrics.summary().emergency_detections, 1);
        assert_eq!(metrics.summary().total_requests, 1);
    }

    #[tokio::test]
    async fn emergency_screen_only_on_symptom_path() {
        let provider = Arc::new(ScriptedProvider::single("Let's get you ready."));
        let d = dispatcher(provider.clone());

        let result = d
            .dispatch(
                Intent::DoctorPrep,
                "prepare notes about my chest pain for the doctor",
                &SessionSnapshot::default(),
            )
            .await;

        assert!(!result.is_emergency);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn custom_emergency_keywords() {
        let provider = Arc::new(ScriptedProvider::single("ok"));
        let d = dispatcher(provider.clone()).with_emergency_keywords(vec!["Seizure".into()]);

        let hit = d
            .dispatch(Intent::Symptom, "my friend had a seizure", &SessionSnapshot::default())
            .await;
        assert!(hit.is_emergency);

        let miss = d
            .dispatch(Intent::Symptom, "I have chest pain", &SessionSnapshot::default())
            .await;
        assert!(!miss.is_emergency);
    }

    #[tokio::test]
    async fn generation_failure_returns_apology() {
        let metrics = Arc::new(MetricsTracker::new());
        let d = dispatcher(Arc::new(FailingProvider)).with_metrics(metrics.clone());

        let result = d
            .dispatch(Intent::Symptom, "I have a headache", &SessionSnapshot::default())
            .await;

        assert_eq!(result.response, prompts::APOLOGY_MESSAGE);
        assert!(result.generation_failed);
        assert!(!result.is_emergency);
        assert!(matches!(result.facts, AgentFacts::Symptom { .. }));

        let summary = metrics.summary();
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.success_rate, 0.0);
    }

    #[tokio::test]
    async fn medication_dispatch_counts_interaction_check() {
        let provider = Arc::new(ScriptedProvider::single("Please check with your pharmacist."));
        let metrics = Arc::new(MetricsTracker::new());
        let d = dispatcher(provider.clone()).with_metrics(metrics.clone());

        let result = d
            .dispatch(
                Intent::Medication,
                "I take aspirin daily. Can I also take ibuprofen for pain?",
                &SessionSnapshot::default(),
            )
            .await;

        assert_eq!(result.agent_key, "medication_manager");
        assert!(provider.requests()[0].prompt.contains("POTENTIAL INTERACTIONS FOUND"));
        let summary = metrics.summary();
        assert_eq!(summary.interactions_checked, 1);
        let calls = summary
            .agent_calls
            .iter()
            .find(|a| a.agent == "medication_manager")
            .unwrap();
        assert_eq!(calls.calls, 1);
    }
}
