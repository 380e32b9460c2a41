//! The orchestrator: classify, dispatch, and fold the result into the session.

use crate::context::SessionState;
use crate::dispatch::{AGENTS, AgentFacts, AgentInfo, DispatchResult, Dispatcher};
use crate::routing::IntentRouter;
use medimind_core::intent::Intent;
use medimind_core::message::Role;
use medimind_core::session::SessionSnapshot;
use medimind_telemetry::MetricsTracker;
use std::sync::Arc;
use tracing::info;

/// Characters of user input echoed into the log.
const LOG_PREVIEW_CHARS: usize = 50;

pub struct Orchestrator {
    router: IntentRouter,
    dispatcher: Dispatcher,
}

impl Orchestrator {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            router: IntentRouter::default(),
            dispatcher,
        }
    }

    pub fn with_router(mut self, router: IntentRouter) -> Self {
        self.router = router;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsTracker>) -> Self {
        self.dispatcher = self.dispatcher.with_metrics(metrics);
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn classify(&self, input: &str) -> Intent {
        self.router.classify(input)
    }

    /// Route `input` and answer it against a read-only session snapshot.
    pub async fn process(&self, input: &str, session: &SessionSnapshot) -> DispatchResult {
        let preview: String = input.chars().take(LOG_PREVIEW_CHARS).collect();
        info!(input = %preview, "Orchestrator processing message");

        let intent = self.classify(input);
        info!(intent = %intent, "Classified intent");

        self.dispatcher.dispatch(intent, input, session).await
    }

    /// Process `input` and record the exchange in `session`.
    ///
    /// Both turns are appended, medications and symptoms the agent found
    /// are added, and a detected emergency keyword becomes a health concern.
    pub async fn respond(&self, session: &mut SessionState, input: &str) -> DispatchResult {
        let snapshot = session.get_context();
        let result = self.process(input, &snapshot).await;

        session.append_message(Role::User, input);
        session.append_message(Role::Model, result.response.as_str());

        match &result.facts {
            AgentFacts::Symptom {
                symptoms_mentioned, ..
            } => {
                for symptom in symptoms_mentioned {
                    session.add_symptom(symptom);
                }
            }
            AgentFacts::Medication {
                medications_mentioned,
                ..
            } => {
                for medication in medications_mentioned {
                    session.add_medication(medication);
                }
            }
            AgentFacts::Emergency { keyword } => {
                session.add_health_concern(keyword);
            }
            AgentFacts::General | AgentFacts::DoctorPrep { .. } => {}
        }

        result
    }

    /// Name and persona preview of every agent, orchestrator first.
    pub fn agents_info(&self) -> Vec<AgentInfo> {
        AGENTS.iter().map(|spec| spec.info()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::GenerationSettings;
    use crate::test_helpers::{ScriptedProvider, sample_reference};

    fn orchestrator(provider: Arc<ScriptedProvider>) -> Orchestrator {
        Orchestrator::new(Dispatcher::new(
            provider,
            GenerationSettings::default(),
            Arc::new(sample_reference()),
        ))
    }

    #[tokio::test]
    async fn process_routes_by_intent() {
        let o = orchestrator(Arc::new(ScriptedProvider::single("ok")));
        let session = SessionSnapshot::default();

        let r = o.process("I have a headache", &session).await;
        assert_eq!(r.intent, Intent::Symptom);
        assert_eq!(r.agent, "SymptomAnalyzer");

        let r = o
            .process("Help me prepare for my doctor appointment tomorrow", &session)
            .await;
        assert_eq!(r.intent, Intent::DoctorPrep);
        assert_eq!(r.agent, "DoctorPrep");

        let r = o.process("Good morning", &session).await;
        assert_eq!(r.intent, Intent::General);
        assert_eq!(r.agent, "Orchestrator");
    }

    #[tokio::test]
    async fn respond_updates_session() {
        let provider = Arc::new(ScriptedProvider::new([
            "Sorry about the headache.",
            "Those two can interact.",
        ]));
        let o = orchestrator(provider.clone());
        let mut session = SessionState::default();

        o.respond(&mut session, "I have a headache").await;
        o.respond(
            &mut session,
            "I take aspirin daily. Can I also take ibuprofen for pain?",
        )
        .await;

        assert_eq!(session.symptoms(), ["headache"]);
        assert_eq!(session.medications(), ["Aspirin", "Ibuprofen"]);

        let history = session.conversation_history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].text, "Sorry about the headache.");
        assert_eq!(history[3].text, "Those two can interact.");

        // The second call saw the first exchange as prior turns.
        let requests = provider.requests();
        assert_eq!(requests[0].history.len(), 0);
        assert_eq!(requests[1].history.len(), 2);
    }

    #[tokio::test]
    async fn session_feeds_doctor_prep() {
        let provider = Arc::new(ScriptedProvider::single("Here is your summary."));
        let o = orchestrator(provider.clone());
        let mut session = SessionState::default();
        session.add_symptom("headache");
        session.add_symptom("nausea");
        session.add_medication("aspirin");
        session.add_medication("ibuprofen");

        let result = o
            .respond(&mut session, "Help me prepare for my doctor appointment tomorrow")
            .await;

        assert_eq!(result.intent, Intent::DoctorPrep);
        let prompt = &provider.requests()[0].prompt;
        for word in ["headache", "nausea", "aspirin", "ibuprofen"] {
            assert!(prompt.contains(word));
        }
    }

    #[tokio::test]
    async fn emergency_becomes_health_concern() {
        let provider = Arc::new(ScriptedProvider::single("unused"));
        let o = orchestrator(provider.clone());
        let mut session = SessionState::default();

        let result = o.respond(&mut session, "I have severe chest pain").await;

        assert!(result.is_emergency);
        assert_eq!(provider.call_count(), 0);
        assert_eq!(session.health_concerns(), ["chest pain"]);
        assert_eq!(session.conversation_history().len(), 2);
    }

    #[test]
    fn agents_info_lists_all_four() {
        let o = orchestrator(Arc::new(ScriptedProvider::single("ok")));
        let names: Vec<String> = o.agents_info().into_iter().map(|a| a.name).collect();
        assert_eq!(
            names,
            ["Orchestrator", "SymptomAnalyzer", "MedicationManager", "DoctorPrep"]
        );
    }
}
