//! The MediMind agent layer.
//!
//! A message flows through four steps:
//!
//! 1. **Route**: the [`IntentRouter`] counts keyword hits per category
//! 2. **Dispatch**: the [`Dispatcher`] picks the agent bound to the intent
//! 3. **Enrich**: the agent builds its prompt from the input, the session
//!    and the reference tables
//! 4. **Generate**: one provider call, answered with a fixed apology on failure
//!
//! The [`Orchestrator`] ties these together and writes the exchange back into
//! the [`SessionState`].

pub mod context;
pub mod dispatch;
pub mod orchestrator;
pub mod routing;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use context::SessionState;
pub use dispatch::{
    AgentFacts, AgentInfo, AgentSpec, DispatchResult, Dispatcher, GenerationSettings,
    VisitSummary,
};
pub use orchestrator::Orchestrator;
pub use routing::{IntentRouter, Lexicon};
