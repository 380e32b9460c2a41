//! Thread-safe metrics tracker.

use crate::model::{AgentCalls, MetricsSummary};
use chrono::{DateTime, Utc};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::{info, warn};

/// Agent keys reported even when they handled nothing.
pub const KNOWN_AGENTS: [&str; 4] = [
    "orchestrator",
    "symptom_analyzer",
    "medication_manager",
    "doctor_prep",
];

/// Collects per-session counters.
///
/// Thread-safe via `RwLock`, so one tracker can be shared behind an `Arc`.
pub struct MetricsTracker {
    counters: RwLock<Counters>,
    session_start: DateTime<Utc>,
}

#[derive(Debug)]
struct Counters {
    total_requests: u64,
    /// Insertion-ordered; seeded with `KNOWN_AGENTS`
    agent_calls: Vec<(String, u64)>,
    response_times: Vec<f64>,
    errors: u64,
    emergency_detections: u64,
    interactions_checked: u64,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            total_requests: 0,
            agent_calls: KNOWN_AGENTS.iter().map(|k| (k.to_string(), 0)).collect(),
            response_times: Vec::new(),
            errors: 0,
            emergency_detections: 0,
            interactions_checked: 0,
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn format_elapsed(elapsed: chrono::Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

impl MetricsTracker {
    pub fn new() -> Self {
        info!("Metrics tracker initialized");
        Self {
            counters: RwLock::new(Counters::default()),
            session_start: Utc::now(),
        }
    }

    pub fn session_start(&self) -> DateTime<Utc> {
        self.session_start
    }

    /// Record one handled request and its latency.
    pub fn track_request(&self, agent_key: &str, response_time: Duration) {
        let secs = response_time.as_secs_f64();
        let mut c = self.counters.write().unwrap_or_else(PoisonError::into_inner);
        c.total_requests += 1;
        match c.agent_calls.iter_mut().find(|(k, _)| k == agent_key) {
            Some((_, calls)) => *calls += 1,
            None => c.agent_calls.push((agent_key.to_string(), 1)),
        }
        c.response_times.push(secs);
        info!(agent = agent_key, response_time = format!("{secs:.2}s"), "Request tracked");
    }

    pub fn track_error(&self, error_type: &str) {
        self.counters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .errors += 1;
        warn!(error_type, "Error tracked");
    }

    pub fn track_emergency(&self) {
        self.counters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .emergency_detections += 1;
        warn!("Emergency detection tracked");
    }

    pub fn track_interaction_check(&self) {
        self.counters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .interactions_checked += 1;
        info!("Drug interaction check tracked");
    }

    /// Snapshot the counters with derived statistics.
    pub fn summary(&self) -> MetricsSummary {
        let c = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        let times = &c.response_times;

        let (avg, min, max) = if times.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let sum: f64 = times.iter().sum();
            let min = times.iter().copied().fold(f64::INFINITY, f64::min);
            let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (sum / times.len() as f64, min, max)
        };

        let error_ratio = c.errors as f64 / c.total_requests.max(1) as f64;

        MetricsSummary {
            total_requests: c.total_requests,
            agent_calls: c
                .agent_calls
                .iter()
                .map(|(agent, calls)| AgentCalls {
                    agent: agent.clone(),
                    calls: *calls,
                })
                .collect(),
            average_response_time: round_to(avg, 2),
            min_response_time: round_to(min, 2),
            max_response_time: round_to(max, 2),
            errors: c.errors,
            emergency_detections: c.emergency_detections,
            interactions_checked: c.interactions_checked,
            session_duration: format_elapsed(Utc::now() - self.session_start),
            success_rate: round_to((1.0 - error_ratio) * 100.0, 1),
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calls_for(summary: &MetricsSummary, agent: &str) -> u64 {
        summary
            .agent_calls
            .iter()
            .find(|a| a.agent == agent)
            .map(|a| a.calls)
            .unwrap_or(0)
    }

    #[test]
    fn empty_tracker_summary() {
        let tracker = MetricsTracker::new();
        let s = tracker.summary();
        assert_eq!(s.total_requests, 0);
        assert_eq!(s.agent_calls.len(), 4);
        assert_eq!(s.average_response_time, 0.0);
        assert_eq!(s.success_rate, 100.0);
        assert_eq!(s.session_duration, "0:00:00");
    }

    #[test]
    fn requests_are_counted_per_agent() {
        let tracker = MetricsTracker::new();
        tracker.track_request("symptom_analyzer", Duration::from_millis(500));
        tracker.track_request("symptom_analyzer", Duration::from_millis(1500));
        tracker.track_request("doctor_prep", Duration::from_millis(1000));

        let s = tracker.summary();
        assert_eq!(s.total_requests, 3);
        assert_eq!(calls_for(&s, "symptom_analyzer"), 2);
        assert_eq!(calls_for(&s, "doctor_prep"), 1);
        assert_eq!(calls_for(&s, "orchestrator"), 0);
        assert_eq!(s.average_response_time, 1.0);
        assert_eq!(s.min_response_time, 0.5);
        assert_eq!(s.max_response_time, 1.5);
    }

    #[test]
    fn unknown_agent_key_is_appended() {
        let tracker = MetricsTracker::new();
        tracker.track_request("triage", Duration::from_millis(10));
        let s = tracker.summary();
        assert_eq!(s.agent_calls.len(), 5);
        assert_eq!(s.agent_calls[4].agent, "triage");
    }

    #[test]
    fn success_rate_accounts_for_errors() {
        let tracker = MetricsTracker::new();
        for _ in 0..3 {
            tracker.track_request("orchestrator", Duration::from_millis(100));
        }
        tracker.track_error("generation");
        assert_eq!(tracker.summary().success_rate, 66.7);
    }

    #[test]
    fn safety_counters() {
        let tracker = MetricsTracker::new();
        tracker.track_emergency();
        tracker.track_interaction_check();
        tracker.track_interaction_check();
        let s = tracker.summary();
        assert_eq!(s.emergency_detections, 1);
        assert_eq!(s.interactions_checked, 2);
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(chrono::Duration::seconds(3725)), "1:02:05");
        assert_eq!(format_elapsed(chrono::Duration::seconds(-4)), "0:00:00");
    }
}
