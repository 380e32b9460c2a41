//! `medimind status`: show the resolved configuration.

use super::config_path;
use medimind_config::AppConfig;
use std::path::Path;

pub fn run(config: AppConfig, explicit_path: Option<&Path>) {
    println!("🩺 MediMind Status");
    println!("==================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Provider:     {}", config.default_provider);
    println!("  Model:        {}", config.active_model());
    println!("  Temperature:  {}", config.temperature);
    println!("  Top-p:        {}", config.top_p);
    println!("  Max tokens:   {}", config.max_tokens);
    println!("  History:      {} messages", config.session.max_history);
    println!("  Memory file:  {}", config.memory.path.display());
    println!("  User:         {}", config.memory.user_id);
    println!("  Data dir:     {}", config.data.dir.display());
    println!(
        "  API key:      {}",
        if config.has_api_key() { "configured" } else { "missing" }
    );
    println!("  Log level:    {}", config.logging.level);

    let path = config_path(explicit_path);
    if path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file, using defaults. Run `medimind onboard` to create one");
    }
}
