//! Data model for metrics summaries and the console report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Calls handled by one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCalls {
    pub agent: String,
    pub calls: u64,
}

/// A point-in-time view of the tracker.
///
/// Latencies are seconds rounded to 2 decimals; `success_rate` is a
/// percentage rounded to 1 decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_requests: u64,
    pub agent_calls: Vec<AgentCalls>,
    pub average_response_time: f64,
    pub min_response_time: f64,
    pub max_response_time: f64,
    pub errors: u64,
    pub emergency_detections: u64,
    pub interactions_checked: u64,
    /// Elapsed session time formatted as `H:MM:SS`
    pub session_duration: String,
    pub success_rate: f64,
}

impl MetricsSummary {
    /// Share of all requests handled by `calls`, in percent.
    pub fn share(&self, calls: u64) -> f64 {
        calls as f64 / self.total_requests.max(1) as f64 * 100.0
    }
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "\n{rule}")?;
        writeln!(f, "📊 MEDIMIND - SESSION METRICS & PERFORMANCE")?;
        writeln!(f, "{rule}")?;

        writeln!(f, "\n⏱️  Session Duration: {}", self.session_duration)?;
        writeln!(f, "📈 Total Requests: {}", self.total_requests)?;
        writeln!(f, "✅ Success Rate: {}%", self.success_rate)?;

        writeln!(f, "\n⚡ Performance:")?;
        writeln!(f, "  • Average Response Time: {}s", self.average_response_time)?;
        writeln!(f, "  • Fastest Response: {}s", self.min_response_time)?;
        writeln!(f, "  • Slowest Response: {}s", self.max_response_time)?;

        writeln!(f, "\n🤖 Agent Activity:")?;
        for entry in &self.agent_calls {
            writeln!(
                f,
                "  • {}: {} calls ({:.1}%)",
                title_case(&entry.agent),
                entry.calls,
                self.share(entry.calls)
            )?;
        }

        writeln!(f, "\n🛡️  Safety Metrics:")?;
        writeln!(f, "  • Emergency Detections: {}", self.emergency_detections)?;
        writeln!(f, "  • Drug Interaction Checks: {}", self.interactions_checked)?;
        writeln!(f, "  • Errors: {}", self.errors)?;
        write!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> MetricsSummary {
        MetricsSummary {
            total_requests: 4,
            agent_calls: vec![
                AgentCalls {
                    agent: "symptom_analyzer".into(),
                    calls: 3,
                },
                AgentCalls {
                    agent: "doctor_prep".into(),
                    calls: 1,
                },
            ],
            average_response_time: 1.25,
            min_response_time: 0.5,
            max_response_time: 2.0,
            errors: 1,
            emergency_detections: 0,
            interactions_checked: 2,
            session_duration: "0:01:05".into(),
            success_rate: 75.0,
        }
    }

    #[test]
    fn title_case_agent_keys() {
        assert_eq!(title_case("medication_manager"), "Medication Manager");
        assert_eq!(title_case("orchestrator"), "Orchestrator");
    }

    #[test]
    fn report_lists_agents_with_share() {
        let report = summary().to_string();
        assert!(report.contains("Symptom Analyzer: 3 calls (75.0%)"));
        assert!(report.contains("Doctor Prep: 1 calls (25.0%)"));
        assert!(report.contains("Success Rate: 75%"));
        assert!(report.contains("Session Duration: 0:01:05"));
    }

    #[test]
    fn share_of_zero_requests_is_zero() {
        let mut s = summary();
        s.total_requests = 0;
        assert_eq!(s.share(0), 0.0);
    }
}
