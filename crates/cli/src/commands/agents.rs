//! `medimind agents`: list the specialized agents.

use medimind_agent::dispatch::AGENTS;

pub fn run() {
    println!("🩺 MediMind Agents");
    println!("==================");
    for spec in AGENTS.iter() {
        let info = spec.info();
        println!();
        println!("  {} ({})", info.name, spec.intent);
        println!("    {}", info.instruction);
    }
    println!();
}
