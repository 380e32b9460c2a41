//! # MediMind Core
//!
//! Domain types, traits, and error definitions for the MediMind health
//! assistant. This crate has **no framework dependencies**: it defines the
//! model every other crate implements against.
//!
//! ## Design Philosophy
//!
//! The two external seams are traits here:
//! - [`Provider`]: the single text-generation call
//! - [`MemoryStore`]: durable storage for the all-users memory document
//!
//! Implementations live in `medimind-providers` and `medimind-memory`, and
//! tests swap in deterministic stubs.

pub mod error;
pub mod intent;
pub mod message;
pub mod provider;
pub mod record;
pub mod reference;
pub mod session;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use error::{MemoryError, ProviderError};
pub use intent::Intent;
pub use message::{Message, Role};
pub use provider::{GenerationRequest, GenerationResponse, Provider, Usage};
pub use record::{DoctorVisit, MemoryDocument, MemoryRecord, SymptomEntry};
pub use reference::{Interaction, Medication, ReferenceData, SymptomInfo};
pub use session::SessionSnapshot;
pub use store::MemoryStore;
