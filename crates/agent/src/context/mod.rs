//! Short-term conversation context.

pub mod session;

pub use session::SessionState;
