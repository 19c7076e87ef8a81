//! Configuration
//!
//! YAML configuration with serde-supplied defaults. A missing or broken
//! file degrades to the default configuration with a warning, so the
//! binary always starts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use agentry_core::{ExecutionMode, GenerationOptions, OrchestratorConfig};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentSection,

    #[serde(default)]
    pub model: ModelSection,

    #[serde(default)]
    pub tools: ToolsSection,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentSection {
    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_mode")]
    pub mode: ExecutionMode,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelSection {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Base URL of the provider API, e.g. `http://localhost:11434`
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolsSection {
    /// Catalog namespace to discover (empty = everything)
    #[serde(default)]
    pub namespace: String,

    /// Instance tools to enable (empty = all)
    #[serde(default)]
    pub enabled: Vec<String>,

    /// Working directory handed to the shell tool
    #[serde(default = "default_workspace")]
    pub workspace: String,

    #[serde(default)]
    pub web_search: WebSearchSection,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WebSearchSection {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_agent_name() -> String {
    "agentry".into()
}
fn default_mode() -> ExecutionMode {
    ExecutionMode::Single
}
fn default_max_iterations() -> usize {
    10
}
fn default_provider() -> String {
    "ollama".into()
}
fn default_model() -> String {
    "llama3.2".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_workspace() -> String {
    "./workspace".into()
}
fn default_max_results() -> usize {
    5
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            mode: default_mode(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            base_url: None,
        }
    }
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            enabled: Vec::new(),
            workspace: default_workspace(),
            web_search: WebSearchSection::default(),
        }
    }
}

impl Default for WebSearchSection {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            max_results: default_max_results(),
        }
    }
}

impl Config {
    /// Load configuration, degrading to defaults on any problem.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                tracing::warn!(
                    path = %path.display(),
                    "Config file not found, using default configuration"
                );
                return Self::default();
            }
        };

        match serde_yaml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Configuration loaded");
                config
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Invalid config file, using default configuration");
                Self::default()
            }
        }
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.model.model.clone(),
            temperature: self.model.temperature,
            max_tokens: self.model.max_tokens,
            ..GenerationOptions::default()
        }
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            name: self.agent.name.clone(),
            default_mode: self.agent.mode,
            max_iterations: self.agent.max_iterations,
            generation: self.generation_options(),
        }
    }

    /// Whether an instance tool should be registered under the `enabled`
    /// filter (an empty list enables everything).
    pub fn tool_enabled(&self, name: &str) -> bool {
        self.tools.enabled.is_empty() || self.tools.enabled.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_stand_alone() {
        let config = Config::default();
        assert_eq!(config.agent.name, "agentry");
        assert_eq!(config.agent.mode, ExecutionMode::Single);
        assert_eq!(config.model.model, "llama3.2");
        assert!(config.tool_enabled("anything"));
    }

    #[test]
    fn partial_yaml_merges_with_defaults() {
        let config: Config = serde_yaml::from_str(
            "agent:\n  mode: multi\nmodel:\n  model: qwen2.5\n",
        )
        .unwrap();
        assert_eq!(config.agent.mode, ExecutionMode::Multi);
        assert_eq!(config.agent.max_iterations, 10);
        assert_eq!(config.model.model, "qwen2.5");
        assert_eq!(config.model.temperature, 0.7);
        assert_eq!(config.tools.workspace, "./workspace");
    }

    #[test]
    fn enabled_list_filters_tools() {
        let config: Config = serde_yaml::from_str(
            "tools:\n  enabled:\n    - web_search\n",
        )
        .unwrap();
        assert!(config.tool_enabled("web_search"));
        assert!(!config.tool_enabled("shell"));
    }

    #[test]
    fn orchestrator_config_reflects_sections() {
        let config: Config =
            serde_yaml::from_str("agent:\n  name: jeeves\n  max_iterations: 3\n").unwrap();
        let orch = config.orchestrator_config();
        assert_eq!(orch.name, "jeeves");
        assert_eq!(orch.max_iterations, 3);
        assert_eq!(orch.generation.model, "llama3.2");
    }

    #[test]
    fn missing_file_degrades_to_defaults() {
        let config = Config::load("/definitely/not/here.yaml");
        assert_eq!(config.agent.name, "agentry");
    }
}
