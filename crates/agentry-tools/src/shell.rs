//! Shell Tool
//!
//! Runs a command in a configured working directory. Destructive command
//! patterns are refused and output is truncated to a fixed budget.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;

use agentry_core::error::{AgentError, Result};
use agentry_core::tool::{ParameterSchema, Tool, ToolCall, ToolResult, ToolSchema};

const OUTPUT_LIMIT: usize = 100 * 1024;

const DENIED_PATTERNS: &[&str] = &[
    "rm -rf",
    "rm -r",
    "mkfs",
    "format",
    "dd if=",
    "> /dev/sd",
    "shutdown",
    "reboot",
    ":(){ :|:& };:",
    "chmod -R",
    "chown -R",
];

/// Shell command execution tool
pub struct ShellTool {
    working_dir: PathBuf,
}

impl ShellTool {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    fn denied_pattern(command: &str) -> Option<&'static str> {
        let lowered = command.to_lowercase();
        DENIED_PATTERNS
            .iter()
            .find(|pattern| lowered.contains(&pattern.to_lowercase()))
            .copied()
    }
}

#[async_trait]
impl Tool for ShellTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "shell".into(),
            description: "Execute a shell command (destructive patterns are blocked)".into(),
            parameters: vec![ParameterSchema {
                name: "command".into(),
                param_type: "string".into(),
                description: "The shell command to execute".into(),
                required: true,
                default: None,
                enum_values: None,
            }],
            category: Some("system".into()),
            has_side_effects: true,
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let command = call
            .arguments
            .get("command")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::ToolValidation("Missing command".into()))?;

        if let Some(pattern) = Self::denied_pattern(command) {
            tracing::warn!(command, pattern, "Refusing blocked command");
            return Ok(ToolResult::failure(
                "shell",
                format!("Command blocked: dangerous pattern '{pattern}' detected"),
            ));
        }

        tracing::debug!(command, "Running shell command");
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&self.working_dir)
            .output()
            .await?;

        let mut result = String::from_utf8_lossy(&output.stdout).to_string();
        if !output.stderr.is_empty() {
            result.push_str("\nSTDERR:\n");
            result.push_str(&String::from_utf8_lossy(&output.stderr));
        }

        if result.len() > OUTPUT_LIMIT {
            result = format!(
                "{}... (truncated: output exceeds {}KB)",
                truncate_at_boundary(&result, OUTPUT_LIMIT),
                OUTPUT_LIMIT / 1024
            );
        }

        if result.is_empty() {
            result = "(no output)".to_string();
        }

        if output.status.success() {
            Ok(ToolResult::success("shell", result))
        } else {
            Ok(ToolResult::failure(
                "shell",
                format!(
                    "exit status {}: {}",
                    output.status.code().unwrap_or(-1),
                    result.trim()
                ),
            ))
        }
    }
}

/// Cut at the last char boundary at or below `limit`.
fn truncate_at_boundary(text: &str, limit: usize) -> &str {
    let mut end = limit.min(text.len());
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(command: &str) -> ToolCall {
        ToolCall::new("shell", [("command".to_string(), json!(command))])
    }

    fn tool() -> ShellTool {
        ShellTool::new(std::env::temp_dir())
    }

    #[tokio::test]
    async fn captures_stdout() {
        let result = tool().execute(&call("echo agentry")).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output.trim(), "agentry");
    }

    #[tokio::test]
    async fn nonzero_exit_is_a_failure() {
        let result = tool().execute(&call("exit 3")).await.unwrap();
        assert!(!result.success);
        assert!(result.output.contains("exit status 3"));
    }

    #[tokio::test]
    async fn destructive_pattern_is_blocked() {
        let result = tool().execute(&call("rm -rf /")).await.unwrap();
        assert!(!result.success);
        assert!(result.output.contains("rm -rf"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "ééééé";
        let cut = truncate_at_boundary(text, 3);
        assert_eq!(cut, "é");
    }
}
