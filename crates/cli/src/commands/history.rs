//! `medimind history`: show or extend a user's long-term record.

use super::open_memory;
use medimind_config::AppConfig;

pub fn run(
    config: AppConfig,
    user: Option<String>,
    add_condition: Option<String>,
    record_visit: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut memory = open_memory(&config, user);

    if let Some(condition) = add_condition {
        if memory.add_chronic_condition(&condition)? {
            println!("  ✅ Recorded chronic condition: {condition}");
        } else {
            println!("  Already recorded: {condition}");
        }
    }

    if let Some(notes) = record_visit {
        memory.record_doctor_visit(&notes)?;
        println!("  ✅ Recorded doctor visit");
    }

    println!();
    println!("  Health record for {}", memory.user_id());
    println!("  ==================={}", "=".repeat(memory.user_id().len()));

    let Some(record) = memory.get_user_history() else {
        println!("  No saved history yet.");
        return Ok(());
    };

    println!("  Since:        {}", record.created_at.format("%Y-%m-%d"));
    println!("  Medications:  {}", joined(&record.medications));
    println!("  Conditions:   {}", joined(&record.chronic_conditions));

    println!("  Symptoms:");
    if record.symptom_history.is_empty() {
        println!("    (none)");
    }
    for entry in &record.symptom_history {
        println!(
            "    {}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.symptom
        );
    }

    println!("  Doctor visits:");
    if record.doctor_visits.is_empty() {
        println!("    (none)");
    }
    for visit in &record.doctor_visits {
        println!(
            "    {}  {}",
            visit.timestamp.format("%Y-%m-%d"),
            visit.notes
        );
    }
    println!();

    Ok(())
}

fn joined(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".into()
    } else {
        items.join(", ")
    }
}
