//! `medimind onboard`: first-time setup.

use super::config_path;
use medimind_config::AppConfig;
use std::path::Path;

pub fn run(explicit_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path(explicit_path);

    println!("🩺 MediMind: First-Time Setup");
    println!("=============================\n");

    if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        } else {
            println!("  Config directory exists: {}", dir.display());
        }
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Set GOOGLE_API_KEY (or add api_key to {})", config_path.display());
    println!("   2. Run: medimind doctor");
    println!("   3. Run: medimind chat\n");

    Ok(())
}
