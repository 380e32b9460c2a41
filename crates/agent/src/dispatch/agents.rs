//! The agent table.
//!
//! Each agent is a plain record: a display name, a metrics key, the intent
//! it serves, its persona, and a function that turns the user's input plus
//! context into the prompt actually sent to the model.

use super::prompts;
use medimind_core::intent::Intent;
use medimind_core::reference::{Interaction, ReferenceData};
use medimind_core::session::SessionSnapshot;
use serde::Serialize;

/// Clarifying questions offered to the symptom agent.
pub const MAX_SYMPTOM_QUESTIONS: usize = 5;

/// Characters of the persona shown in agent listings.
pub const INSTRUCTION_PREVIEW_CHARS: usize = 100;

/// Everything an enrichment function may read.
#[derive(Debug, Clone, Copy)]
pub struct EnrichContext<'a> {
    pub input: &'a str,
    pub session: &'a SessionSnapshot,
    pub reference: &'a ReferenceData,
}

/// The assembled prompt plus the structured facts found while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub prompt: String,
    pub facts: AgentFacts,
}

/// Session facts collected for the doctor visit summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisitSummary {
    pub symptoms: Vec<String>,
    pub medications: Vec<String>,
    pub concerns: Vec<String>,
}

/// Agent-specific structured output accompanying a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentFacts {
    General,
    Symptom {
        symptom_questions: Vec<String>,
        symptoms_mentioned: Vec<String>,
    },
    Emergency {
        keyword: String,
    },
    Medication {
        medications_mentioned: Vec<String>,
        interactions_found: Vec<Interaction>,
    },
    DoctorPrep {
        summary: VisitSummary,
    },
}

pub type EnrichFn = fn(&EnrichContext<'_>) -> Enrichment;

pub struct AgentSpec {
    pub name: &'static str,
    /// Stable key used for metrics
    pub key: &'static str,
    pub intent: Intent,
    pub instruction: &'static str,
    pub enrich: EnrichFn,
    /// Scan input for emergency keywords before generating
    pub screens_emergencies: bool,
}

impl std::fmt::Debug for AgentSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSpec")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("intent", &self.intent)
            .field("screens_emergencies", &self.screens_emergencies)
            .finish()
    }
}

/// Name and persona preview for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentInfo {
    pub name: String,
    pub instruction: String,
}

impl AgentSpec {
    pub fn info(&self) -> AgentInfo {
        let preview: String = self
            .instruction
            .chars()
            .take(INSTRUCTION_PREVIEW_CHARS)
            .collect();
        AgentInfo {
            name: self.name.to_string(),
            instruction: format!("{preview}..."),
        }
    }
}

pub static AGENTS: [AgentSpec; 4] = [
    AgentSpec {
        name: "Orchestrator",
        key: "orchestrator",
        intent: Intent::General,
        instruction: prompts::ORCHESTRATOR_INSTRUCTION,
        enrich: enrich_general,
        screens_emergencies: false,
    },
    AgentSpec {
        name: "SymptomAnalyzer",
        key: "symptom_analyzer",
        intent: Intent::Symptom,
        instruction: prompts::SYMPTOM_ANALYZER_INSTRUCTION,
        enrich: enrich_symptom,
        screens_emergencies: true,
    },
    AgentSpec {
        name: "MedicationManager",
        key: "medication_manager",
        intent: Intent::Medication,
        instruction: prompts::MEDICATION_MANAGER_INSTRUCTION,
        enrich: enrich_medication,
        screens_emergencies: false,
    },
    AgentSpec {
        name: "DoctorPrep",
        key: "doctor_prep",
        intent: Intent::DoctorPrep,
        instruction: prompts::DOCTOR_PREP_INSTRUCTION,
        enrich: enrich_doctor_prep,
        screens_emergencies: false,
    },
];

/// The agent bound to `intent`.
pub fn agent_for(intent: Intent) -> &'static AgentSpec {
    match intent {
        Intent::General => &AGENTS[0],
        Intent::Symptom => &AGENTS[1],
        Intent::Medication => &AGENTS[2],
        Intent::DoctorPrep => &AGENTS[3],
    }
}

fn enrich_general(ctx: &EnrichContext<'_>) -> Enrichment {
    Enrichment {
        prompt: ctx.input.to_string(),
        facts: AgentFacts::General,
    }
}

fn enrich_symptom(ctx: &EnrichContext<'_>) -> Enrichment {
    let questions = ctx.reference.questions_for(ctx.input, MAX_SYMPTOM_QUESTIONS);
    let symptoms = ctx.reference.symptoms_in(ctx.input);

    let mut prompt = format!("User symptom report: {}\n\n", ctx.input);
    if !questions.is_empty() {
        prompt.push_str("Relevant questions to consider asking:\n");
        for (i, q) in questions.iter().enumerate() {
            prompt.push_str(&format!("{}. {q}\n", i + 1));
        }
        prompt.push('\n');
    }
    prompt.push_str("Please respond with empathy and ask 2-3 of the most relevant questions.");

    Enrichment {
        prompt,
        facts: AgentFacts::Symptom {
            symptom_questions: questions,
            symptoms_mentioned: symptoms,
        },
    }
}

/// Mentioned medications followed by session ones, case-insensitively unique.
fn interaction_candidates(mentioned: &[String], session: &[String]) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    for name in mentioned.iter().chain(session) {
        if !candidates.iter().any(|c| c.eq_ignore_ascii_case(name)) {
            candidates.push(name.clone());
        }
    }
    candidates
}

/// Known interactions among every unordered pair of `medications`.
pub fn find_interactions(reference: &ReferenceData, medications: &[String]) -> Vec<Interaction> {
    let mut found = Vec::new();
    for (i, a) in medications.iter().enumerate() {
        for b in &medications[i + 1..] {
            if let Some(interaction) = reference.find_interaction(a, b) {
                found.push(interaction.clone());
            }
        }
    }
    found
}

fn enrich_medication(ctx: &EnrichContext<'_>) -> Enrichment {
    let mentioned = ctx.reference.extract_medications(ctx.input);
    let candidates = interaction_candidates(&mentioned, &ctx.session.user_medications);
    let interactions = find_interactions(ctx.reference, &candidates);

    let mut prompt = format!("User medication query: {}\n\n", ctx.input);
    if !mentioned.is_empty() {
        prompt.push_str(&format!("Medications mentioned: {}\n\n", mentioned.join(", ")));
    }
    if !interactions.is_empty() {
        prompt.push_str("⚠️ POTENTIAL INTERACTIONS FOUND:\n");
        for interaction in &interactions {
            prompt.push_str(&format!(
                "- {} + {}: {} - {}\n  Recommendation: {}\n\n",
                interaction.drug1,
                interaction.drug2,
                interaction.severity.to_uppercase(),
                interaction.description,
                interaction.recommendation,
            ));
        }
    }
    prompt.push_str(
        "Please respond with this interaction information and emphasize consulting healthcare providers.",
    );

    Enrichment {
        prompt,
        facts: AgentFacts::Medication {
            medications_mentioned: mentioned,
            interactions_found: interactions,
        },
    }
}

fn enrich_doctor_prep(ctx: &EnrichContext<'_>) -> Enrichment {
    let summary = VisitSummary {
        symptoms: ctx.session.symptoms_discussed.clone(),
        medications: ctx.session.user_medications.clone(),
        concerns: ctx.session.health_concerns.clone(),
    };

    let mut prompt = format!("User request: {}\n\nBased on our conversation:\n\n", ctx.input);
    if !summary.symptoms.is_empty() {
        prompt.push_str(&format!("Symptoms discussed: {}\n", summary.symptoms.join(", ")));
    }
    if !summary.medications.is_empty() {
        prompt.push_str(&format!(
            "Medications mentioned: {}\n",
            summary.medications.join(", ")
        ));
    }
    if !summary.concerns.is_empty() {
        prompt.push_str(&format!("Health concerns: {}\n", summary.concerns.join(", ")));
    }
    prompt.push_str("\nPlease create a comprehensive doctor visit preparation summary.");

    Enrichment {
        prompt,
        facts: AgentFacts::DoctorPrep { summary },
    }
}
