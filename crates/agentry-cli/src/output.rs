//! Terminal Output
//!
//! Fixed-width banner and result rendering for one-shot and interactive
//! use.

use agentry_core::{AgentInfo, TaskRecord, ToolSchema};

const WIDTH: usize = 72;

fn rule() -> String {
    "=".repeat(WIDTH)
}

fn centered(text: &str) -> String {
    if text.len() >= WIDTH {
        return text.to_string();
    }
    let pad = (WIDTH - text.len()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Startup banner
pub fn banner(name: &str) {
    println!("{}", rule());
    println!("{}", centered(&format!("{name} - agent orchestration framework")));
    println!("{}", rule());
    println!("{}", centered("Type 'help' to list commands, 'exit' to quit."));
    println!("{}", rule());
    println!();
}

/// Render an executed task
pub fn display_result(record: &TaskRecord, verbose: bool) {
    println!();
    println!("{}", rule());
    println!("{}", centered("TASK RESULT"));
    println!("{}", rule());
    println!("Task: {}", record.task);
    println!();
    println!("Answer:");
    println!("{}", record.answer);

    if verbose {
        println!();
        println!("Execution Details:");
        println!("Mode: {}", record.mode);
        println!("Iterations: {}", record.iterations);
        println!("Duration: {}ms", record.duration_ms);
    }

    println!("{}", rule());
}

/// Render the task history, newest first
pub fn display_history(records: &[TaskRecord]) {
    if records.is_empty() {
        println!("No task history available.");
        return;
    }

    println!("Task History:");
    println!("{}", "-".repeat(60));

    for (i, record) in records.iter().rev().enumerate() {
        println!(
            "{}. [{}] ({}) completed",
            i + 1,
            record.started_at.format("%Y-%m-%d %H:%M:%S"),
            record.mode
        );
        println!("   Task: {}", record.task);
        let summary: String = record.answer.chars().take(100).collect();
        if record.answer.chars().count() > 100 {
            println!("   Answer: {summary}...");
        } else {
            println!("   Answer: {summary}");
        }
        println!();
    }
}

/// Render the registered tools
pub fn display_tools(schemas: &[ToolSchema]) {
    if schemas.is_empty() {
        println!("No tools registered.");
        return;
    }

    println!("Available Tools:");
    println!("{}", "-".repeat(60));
    for schema in schemas {
        println!("  {} - {}", schema.name, schema.description);
    }
    println!();
    println!("Total tools: {}", schemas.len());
}

/// Render the managed agents
pub fn display_agents(agents: &[AgentInfo]) {
    println!("Available Agents:");
    println!("{}", "-".repeat(40));
    for agent in agents {
        let prefix = if agent.primary { "* " } else { "  " };
        println!("{}{} ({})", prefix, agent.name, agent.role);
    }
    println!();
    println!("Total agents: {}", agents.len());
}

/// Interactive command help
pub fn display_help() {
    println!("Commands:");
    println!("  tools             List registered tools");
    println!("  agents            List managed agents");
    println!("  history [n]       Show the last n executed tasks (default 5)");
    println!("  config            Show the active configuration");
    println!("  exit | quit       Leave the session");
    println!();
    println!("Anything else runs as a task; prefix with 'single', 'multi'");
    println!("or 'auto' to force a mode for that task.");
}
