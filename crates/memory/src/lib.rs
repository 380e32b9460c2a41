//! Long-term memory for MediMind.
//!
//! The [`MemoryBank`] accumulates medications and symptom history per user
//! across sessions. Persistence goes through a [`MemoryStore`]:
//! [`JsonFileStore`] in production and [`InMemoryStore`] for tests.
//!
//! [`MemoryStore`]: medimind_core::MemoryStore

pub mod bank;
pub mod file_backend;
pub mod in_memory;
pub mod reference;

pub use bank::MemoryBank;
pub use file_backend::JsonFileStore;
pub use in_memory::InMemoryStore;
pub use reference::load_reference_data;
