//! Text Tool
//!
//! String transformation and analysis over a single `text` argument,
//! selected by an `operation` argument.

use async_trait::async_trait;
use serde_json::json;

use agentry_core::error::{AgentError, Result};
use agentry_core::tool::{ParameterSchema, Tool, ToolCall, ToolResult, ToolSchema};

/// Text manipulation tool
pub struct TextTool;

const OPERATIONS: &[&str] = &[
    "uppercase",
    "lowercase",
    "capitalize",
    "reverse",
    "trim",
    "word_count",
    "char_count",
];

#[async_trait]
impl Tool for TextTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "text".into(),
            description: "Transform or analyze text: uppercase, lowercase, capitalize, reverse, trim, word_count, char_count".into(),
            parameters: vec![
                ParameterSchema {
                    name: "text".into(),
                    param_type: "string".into(),
                    description: "The text to operate on".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                },
                ParameterSchema {
                    name: "operation".into(),
                    param_type: "string".into(),
                    description: format!("One of: {}", OPERATIONS.join(", ")),
                    required: true,
                    default: None,
                    enum_values: None,
                },
            ],
            category: Some("data".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let text = call
            .arguments
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::ToolValidation("Missing text".into()))?;
        let operation = call
            .arguments
            .get("operation")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::ToolValidation("Missing operation".into()))?;

        let result = match operation {
            "uppercase" => ToolResult::success("text", text.to_uppercase()),
            "lowercase" => ToolResult::success("text", text.to_lowercase()),
            "capitalize" => ToolResult::success("text", capitalize_words(text)),
            "reverse" => ToolResult::success("text", text.chars().rev().collect::<String>()),
            "trim" => ToolResult::success("text", text.trim()),
            "word_count" => {
                let count = text.split_whitespace().count();
                ToolResult::success("text", count.to_string()).with_data(json!(count))
            }
            "char_count" => {
                let count = text.chars().count();
                ToolResult::success("text", count.to_string()).with_data(json!(count))
            }
            other => ToolResult::failure("text", format!("Unknown operation: {other}")),
        };

        Ok(result)
    }
}

fn capitalize_words(text: &str) -> String {
    text.split_inclusive(char::is_whitespace)
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentry_core::tool::{ToolCollection, ToolOutcome};

    fn call(args: &[(&str, &str)]) -> ToolCall {
        ToolCall::new(
            "text",
            args.iter()
                .map(|(k, v)| ((*k).to_string(), json!(v))),
        )
    }

    #[tokio::test]
    async fn uppercase_through_the_envelope() {
        let mut collection = ToolCollection::new();
        collection.register_tool(TextTool);

        let outcome = collection
            .execute_tool(&call(&[("text", "Hello World"), ("operation", "uppercase")]))
            .await;
        match outcome {
            ToolOutcome::Success { result } => assert_eq!(result, json!("HELLO WORLD")),
            ToolOutcome::Error { error } => panic!("unexpected error: {error}"),
        }
    }

    #[tokio::test]
    async fn unknown_operation_reports_through_the_envelope() {
        let mut collection = ToolCollection::new();
        collection.register_tool(TextTool);

        let outcome = collection
            .execute_tool(&call(&[("text", "abc"), ("operation", "bogus")]))
            .await;
        match outcome {
            ToolOutcome::Error { error } => {
                assert_eq!(error, "Error executing tool text: Unknown operation: bogus");
            }
            ToolOutcome::Success { .. } => panic!("expected error"),
        }
    }

    #[tokio::test]
    async fn missing_argument_is_rejected_before_execution() {
        let mut collection = ToolCollection::new();
        collection.register_tool(TextTool);

        let outcome = collection
            .execute_tool(&call(&[("operation", "uppercase")]))
            .await;
        match outcome {
            ToolOutcome::Error { error } => assert_eq!(error, "Invalid input for tool text"),
            ToolOutcome::Success { .. } => panic!("expected error"),
        }
    }

    #[tokio::test]
    async fn word_count_returns_structured_data() {
        let result = TextTool
            .execute(&call(&[("text", "  one two   three "), ("operation", "word_count")]))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.data, Some(json!(3)));
    }

    #[tokio::test]
    async fn reverse_handles_multibyte_text() {
        let result = TextTool
            .execute(&call(&[("text", "héllo"), ("operation", "reverse")]))
            .await
            .unwrap();
        assert_eq!(result.output, "olléh");
    }

    #[tokio::test]
    async fn capitalize_touches_every_word() {
        let result = TextTool
            .execute(&call(&[("text", "hello brave world"), ("operation", "capitalize")]))
            .await
            .unwrap();
        assert_eq!(result.output, "Hello Brave World");
    }
}
