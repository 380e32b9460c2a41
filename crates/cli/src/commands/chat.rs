//! `medimind chat`: interactive or single-message health chat.

use super::{build_orchestrator, open_memory, print_api_key_help};
use medimind_agent::{Orchestrator, SessionState};
use medimind_config::AppConfig;
use medimind_core::MemoryError;
use medimind_memory::MemoryBank;
use medimind_telemetry::MetricsTracker;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// A line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Exit,
    Save,
    Clear,
    History,
    Metrics,
    Agents,
    Help,
    Empty,
    Message(String),
}

impl ChatCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Self::Empty,
            "exit" | "quit" | "/exit" | "/quit" => Self::Exit,
            "/save" => Self::Save,
            "/clear" => Self::Clear,
            "/history" => Self::History,
            "/metrics" => Self::Metrics,
            "/agents" => Self::Agents,
            "/help" => Self::Help,
            _ => Self::Message(trimmed.to_string()),
        }
    }
}

pub async fn run(
    config: AppConfig,
    message: Option<String>,
    user: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(MetricsTracker::new());
    let orchestrator = match build_orchestrator(&config, metrics.clone()) {
        Ok(o) => o,
        Err(e) => {
            if !config.has_api_key() {
                print_api_key_help();
            }
            return Err(e);
        }
    };

    let mut memory = open_memory(&config, user);
    let mut session = SessionState::new(config.session.max_history);

    if let Some(msg) = message {
        eprint!("  Thinking...");
        let result = orchestrator.respond(&mut session, &msg).await;
        eprint!("\r              \r");
        println!("{}", result.response);
        save_if_needed(&mut memory, &mut session);
        return Ok(());
    }

    print_banner(&config, &memory);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        match ChatCommand::parse(&line) {
            ChatCommand::Exit => break,
            ChatCommand::Empty => {}
            ChatCommand::Save => match persist_session(&mut memory, &mut session) {
                Ok(true) => println!("  Session saved for {}.", memory.user_id()),
                Ok(false) => println!("  Nothing new to save."),
                Err(e) => eprintln!("  [Error] Could not save session: {e}"),
            },
            ChatCommand::Clear => {
                session.clear();
                println!("  Session cleared.");
            }
            ChatCommand::History => print_session(&session),
            ChatCommand::Metrics => println!("{}", metrics.summary()),
            ChatCommand::Agents => print_agents(&orchestrator),
            ChatCommand::Help => print_help(),
            ChatCommand::Message(text) => {
                eprint!("  ...");
                let result = orchestrator.respond(&mut session, &text).await;
                eprint!("\r     \r");
                println!();
                for line in result.response.lines() {
                    println!("  {} > {line}", result.agent);
                }
                println!();
            }
        }
        prompt()?;
    }

    save_if_needed(&mut memory, &mut session);

    println!();
    println!("{}", metrics.summary());
    println!("  Take care! Remember: MediMind does not replace professional medical advice.");
    println!();

    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

/// Save whatever the session collected since its last save.
///
/// Returns `false` when there was nothing new.
fn persist_session(
    memory: &mut MemoryBank,
    session: &mut SessionState,
) -> Result<bool, MemoryError> {
    let Some(pending) = session.unsaved() else {
        return Ok(false);
    };
    memory.save_session(&pending)?;
    session.mark_saved();
    Ok(true)
}

/// Auto-save on the way out.
fn save_if_needed(memory: &mut MemoryBank, session: &mut SessionState) {
    match persist_session(memory, session) {
        Ok(true) => tracing::info!(user = memory.user_id(), "Session saved to memory bank"),
        Ok(false) => {}
        Err(e) => eprintln!("  [Error] Could not save session: {e}"),
    }
}

fn print_banner(config: &AppConfig, memory: &MemoryBank) {
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║     MediMind Health Assistant: Interactive   ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", config.active_model());
    println!("  User:      {}", memory.user_id());

    if let Some(record) = memory.get_user_history() {
        if !record.medications.is_empty() {
            println!("  Remembered medications: {}", record.medications.join(", "));
        }
        if !record.chronic_conditions.is_empty() {
            println!("  Chronic conditions:     {}", record.chronic_conditions.join(", "));
        }
    }

    println!();
    println!("  MediMind offers general health information, not a diagnosis.");
    println!("  In an emergency, call your local emergency number.");
    println!();
    println!("  Type your message and press Enter. Type /help for commands.");
    println!();
}

fn print_session(session: &SessionState) {
    println!();
    println!("  Messages:     {}", session.conversation_history().len());
    println!("  Symptoms:     {}", list_or_none(session.symptoms()));
    println!("  Medications:  {}", list_or_none(session.medications()));
    println!("  Concerns:     {}", list_or_none(session.health_concerns()));
    println!();
}

fn print_agents(orchestrator: &Orchestrator) {
    println!();
    for info in orchestrator.agents_info() {
        println!("  {}: {}", info.name, info.instruction);
    }
    println!();
}

fn print_help() {
    println!();
    println!("  /save      Save this session to long-term memory");
    println!("  /clear     Forget this session");
    println!("  /history   Show what this session has collected");
    println!("  /metrics   Show session metrics");
    println!("  /agents    List the specialized agents");
    println!("  exit       Save and quit");
    println!();
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
