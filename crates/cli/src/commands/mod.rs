//! Subcommand implementations and the wiring they share.

pub mod agents;
pub mod chat;
pub mod doctor;
pub mod history;
pub mod onboard;
pub mod status;

use medimind_agent::{Dispatcher, GenerationSettings, Orchestrator};
use medimind_config::AppConfig;
use medimind_core::ReferenceData;
use medimind_memory::{JsonFileStore, MemoryBank, load_reference_data};
use medimind_telemetry::MetricsTracker;
use std::path::PathBuf;
use std::sync::Arc;

/// Path of the config file actually in use.
pub fn config_path(explicit: Option<&std::path::Path>) -> PathBuf {
    explicit
        .map(PathBuf::from)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

pub fn load_reference(config: &AppConfig) -> ReferenceData {
    load_reference_data(
        &config.data.medications_path(),
        &config.data.interactions_path(),
        &config.data.symptoms_path(),
    )
}

/// Open the memory bank for `user`, falling back to the configured id.
pub fn open_memory(config: &AppConfig, user: Option<String>) -> MemoryBank {
    let user_id = user.unwrap_or_else(|| config.memory.user_id.clone());
    MemoryBank::load(Arc::new(JsonFileStore::new(&config.memory.path)), user_id)
}

/// Wire provider, reference data and metrics into an orchestrator.
///
/// Fails when the default provider has no API key.
pub fn build_orchestrator(
    config: &AppConfig,
    metrics: Arc<MetricsTracker>,
) -> Result<Orchestrator, Box<dyn std::error::Error>> {
    config.require_api_key()?;

    let router = medimind_providers::build_from_config(config);
    let provider = router
        .default()
        .ok_or("No default provider configured")?;

    let dispatcher = Dispatcher::new(
        provider,
        GenerationSettings::from_config(config),
        Arc::new(load_reference(config)),
    )
    .with_emergency_keywords(config.safety.emergency_keywords.clone())
    .with_metrics(metrics);

    Ok(Orchestrator::new(dispatcher))
}

/// Print a missing-key explanation to stderr.
pub fn print_api_key_help() {
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables (or put it in .env):");
    eprintln!("    GOOGLE_API_KEY=...      (Gemini, default provider)");
    eprintln!("    MEDIMIND_API_KEY=...    (generic)");
    eprintln!("    OPENAI_API_KEY=...      (with default_provider = \"openai\")");
    eprintln!();
    eprintln!("  Or add api_key to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
}
