//! agentry CLI
//!
//! Accepts a natural-language task, assembles the tool collection and the
//! orchestrator, and executes the task one-shot or in an interactive
//! session.

mod config;
mod output;

use std::io::{BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agentry_core::{ExecutionMode, LlmProvider, Orchestrator, ToolCollection};
use agentry_runtime::{OllamaConfig, OllamaProvider};
use agentry_tools::{catalog, DirectResponseTool, ShellTool, WebSearchTool};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "agentry",
    about = "Agent orchestration framework",
    after_help = "Just state the task; agentry figures out the rest."
)]
struct Cli {
    /// What you want done (e.g. "research quantum computing")
    task: Vec<String>,

    /// Force an execution mode: single, multi, or auto
    #[arg(long)]
    mode: Option<String>,

    /// Path to the configuration file
    #[arg(long, default_value = "config.yaml")]
    config: String,

    /// Show detailed output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let mode = cli
        .mode
        .as_deref()
        .map(str::parse::<ExecutionMode>)
        .transpose()?;

    let config = Config::load(&cli.config);

    // Initialize LLM provider
    let provider: Arc<dyn LlmProvider> = Arc::new(build_provider(&config));

    // Verify provider connection
    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("Connected to {} provider", config.model.provider);
            if cli.verbose {
                if let Ok(models) = provider.list_models().await {
                    for model in models {
                        tracing::info!("  Model: {}", model.id);
                    }
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("Provider not available - tasks will fail");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    let tools = Arc::new(assemble_tools(&config, Arc::clone(&provider)));
    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  - {}", name);
    }

    let mut orchestrator = Orchestrator::new(provider, tools, config.orchestrator_config());

    if cli.task.is_empty() {
        interactive(&mut orchestrator, &config, cli.verbose).await
    } else {
        let task = cli.task.join(" ");
        let record = orchestrator
            .execute_task(&task, mode.or(Some(ExecutionMode::Auto)))
            .await?;
        output::display_result(&record, cli.verbose);
        Ok(())
    }
}

fn build_provider(config: &Config) -> OllamaProvider {
    match &config.model.base_url {
        Some(base_url) => OllamaProvider::from_config(OllamaConfig::from_base_url(base_url)),
        None => OllamaProvider::from_env(),
    }
}

/// Assemble the tool collection: discover the built-in catalog, then
/// register the configured instance tools.
fn assemble_tools(config: &Config, provider: Arc<dyn LlmProvider>) -> ToolCollection {
    let mut tools = ToolCollection::new();

    let discovered = tools.discover_tools(&catalog::builtin(), &config.tools.namespace);
    tracing::info!(
        discovered,
        namespace = %config.tools.namespace,
        "Catalog discovery finished"
    );

    if config.tool_enabled("web_search") {
        tools.register_tool(WebSearchTool::new(
            config.tools.web_search.api_key.clone(),
            config.tools.web_search.max_results,
        ));
    }
    if config.tool_enabled("shell") {
        tools.register_tool(ShellTool::new(config.tools.workspace.clone()));
    }
    if config.tool_enabled("direct_response") {
        tools.register_tool(DirectResponseTool::new(
            provider,
            config.generation_options(),
        ));
    }

    tools
}

async fn interactive(
    orchestrator: &mut Orchestrator,
    config: &Config,
    verbose: bool,
) -> anyhow::Result<()> {
    output::banner(&config.agent.name);

    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        print!("{}> ", config.agent.name);
        std::io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();

        match input {
            "" => continue,
            "exit" | "quit" => break,
            "help" | "?" => output::display_help(),
            "tools" => output::display_tools(&orchestrator.tools().list_tools()),
            "agents" => output::display_agents(&orchestrator.list_agents()),
            "config" => match serde_yaml::to_string(config) {
                Ok(rendered) => println!("{rendered}"),
                Err(e) => println!("Error: {e}"),
            },
            _ => {
                if let Some(limit) = parse_history_command(input) {
                    output::display_history(orchestrator.task_history(limit));
                    continue;
                }

                let (mode, task) = parse_task_mode(input);
                match orchestrator.execute_task(task, mode).await {
                    Ok(record) => output::display_result(&record, verbose),
                    Err(e) => {
                        tracing::error!(error = %e, "Task failed");
                        println!("Error: {}", e.user_message());
                    }
                }
            }
        }
    }

    if verbose {
        println!(
            "Session closed after {} messages.",
            orchestrator.session().message_count()
        );
    }
    println!("Goodbye.");
    Ok(())
}

/// An optional leading `single`/`multi`/`auto` word forces the mode for
/// one task, e.g. `multi research rust agents`.
fn parse_task_mode(input: &str) -> (Option<ExecutionMode>, &str) {
    if let Some((first, rest)) = input.split_once(' ') {
        if let Ok(mode) = first.parse::<ExecutionMode>() {
            return (Some(mode), rest.trim_start());
        }
    }
    (None, input)
}

/// `history` or `history <n>`
fn parse_history_command(input: &str) -> Option<usize> {
    let rest = input.strip_prefix("history")?;
    let rest = rest.trim();
    if rest.is_empty() {
        Some(5)
    } else {
        rest.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_command_parses_optional_limit() {
        assert_eq!(parse_history_command("history"), Some(5));
        assert_eq!(parse_history_command("history 12"), Some(12));
        assert_eq!(parse_history_command("history twelve"), None);
        assert_eq!(parse_history_command("historical note"), None);
    }

    #[test]
    fn task_mode_prefix_is_optional() {
        assert_eq!(
            parse_task_mode("multi research rust"),
            (Some(ExecutionMode::Multi), "research rust")
        );
        assert_eq!(parse_task_mode("just a task"), (None, "just a task"));
        assert_eq!(parse_task_mode("single"), (None, "single"));
    }
}
