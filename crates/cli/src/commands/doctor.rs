//! `medimind doctor`: diagnose setup problems.

use super::config_path;
use medimind_config::{AppConfig, ConfigError};
use medimind_core::MemoryStore;
use medimind_memory::{JsonFileStore, load_reference_data};
use std::path::Path;

pub async fn run(loaded: Result<AppConfig, ConfigError>, explicit_path: Option<&Path>) {
    println!("🩺 MediMind Doctor: Setup Diagnostics");
    println!("=====================================\n");

    let mut issues = 0;

    let path = config_path(explicit_path);
    if path.exists() {
        println!("  ✅ Config file found: {}", path.display());
    } else {
        println!("  ⚠️  No config file, using defaults. Run `medimind onboard`");
    }

    let config = match loaded {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config file before running further checks.");
            return;
        }
    };

    match config.require_api_key() {
        Ok(_) => {
            if config.provider_needs_key() {
                println!("  ✅ API key configured for {}", config.default_provider);
            } else {
                println!("  ✅ {} needs no API key", config.default_provider);
            }
            if !provider_reachable(&config).await {
                issues += 1;
            }
        }
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    for (label, file) in [
        ("Medications", config.data.medications_path()),
        ("Interactions", config.data.interactions_path()),
        ("Symptoms", config.data.symptoms_path()),
    ] {
        if file.exists() {
            println!("  ✅ {label} data: {}", file.display());
        } else {
            println!("  ⚠️  {label} data missing: {}", file.display());
            issues += 1;
        }
    }

    let reference = load_reference_data(
        &config.data.medications_path(),
        &config.data.interactions_path(),
        &config.data.symptoms_path(),
    );
    println!(
        "  ℹ️  Loaded {} medications, {} interactions, {} symptoms",
        reference.medications.len(),
        reference.interactions.len(),
        reference.symptoms.len()
    );

    let store = JsonFileStore::new(&config.memory.path);
    match store.load() {
        Ok(Some(doc)) => println!("  ✅ Memory bank readable ({} user(s))", doc.len()),
        Ok(None) => println!("  ✅ Memory bank empty, will be created on first save"),
        Err(e) => {
            println!("  ❌ Memory bank unreadable: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }
}

async fn provider_reachable(config: &AppConfig) -> bool {
    let router = medimind_providers::build_from_config(config);
    let Some(provider) = router.default() else {
        println!("  ❌ No provider registered for {}", config.default_provider);
        return false;
    };
    match provider.health_check().await {
        Ok(true) => {
            println!("  ✅ Provider {} reachable", provider.name());
            true
        }
        Ok(false) => {
            println!("  ⚠️  Provider {} answered but reported unhealthy", provider.name());
            false
        }
        Err(e) => {
            println!("  ❌ Provider {} unreachable: {e}", provider.name());
            false
        }
    }
}
