//! Session metrics for MediMind.
//!
//! Counts requests per agent, response latencies, errors, emergency
//! detections and interaction checks for one process. The tracker is an
//! explicit value handed to whoever records into it; there is no global
//! instance.

pub mod engine;
pub mod model;

pub use engine::{KNOWN_AGENTS, MetricsTracker};
pub use model::{AgentCalls, MetricsSummary};
