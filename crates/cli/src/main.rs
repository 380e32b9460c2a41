//! MediMind CLI: the main entry point.
//!
//! Commands:
//! - `chat`     Interactive or single-message health chat
//! - `history`  Show or extend a user's long-term record
//! - `agents`   List the specialized agents
//! - `status`   Show the resolved configuration
//! - `onboard`  Write a default config file
//! - `doctor`   Diagnose setup problems

use clap::{Parser, Subcommand};
use medimind_config::{AppConfig, ConfigError, LoggingConfig};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "medimind",
    about = "MediMind: a multi-agent personal health assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config.toml (default: ~/.medimind/config.toml)
    #[arg(long, global = true, env = "MEDIMIND_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the health assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// User id for long-term memory
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show a user's long-term health record
    History {
        /// User id for long-term memory
        #[arg(short, long)]
        user: Option<String>,

        /// Record a chronic condition
        #[arg(long, value_name = "CONDITION")]
        add_condition: Option<String>,

        /// Record a doctor visit with these notes
        #[arg(long, value_name = "NOTES")]
        record_visit: Option<String>,
    },

    /// List the specialized agents
    Agents,

    /// Show configuration status
    Status,

    /// Initialize configuration
    Onboard,

    /// Diagnose setup problems
    Doctor,
}

fn init_tracing(verbose: bool, logging: &LoggingConfig) {
    let default_filter = if verbose { "debug" } else { logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let loaded: Result<AppConfig, ConfigError> = match &cli.config {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    };

    let logging = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_tracing(cli.verbose, &logging);

    match cli.command {
        Commands::Chat { message, user } => commands::chat::run(loaded?, message, user).await?,
        Commands::History {
            user,
            add_condition,
            record_visit,
        } => commands::history::run(loaded?, user, add_condition, record_visit)?,
        Commands::Agents => commands::agents::run(),
        Commands::Status => commands::status::run(loaded?, cli.config.as_deref()),
        Commands::Onboard => commands::onboard::run(cli.config.as_deref())?,
        Commands::Doctor => commands::doctor::run(loaded, cli.config.as_deref()).await,
    }

    Ok(())
}
