//! DateTime Tool

use async_trait::async_trait;
use serde_json::json;

use agentry_core::error::Result;
use agentry_core::tool::{ParameterSchema, Tool, ToolCall, ToolResult, ToolSchema};

/// DateTime tool - returns current time
pub struct DateTimeTool;

#[async_trait]
impl Tool for DateTimeTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "datetime".into(),
            description: "Get the current date and time".into(),
            parameters: vec![ParameterSchema {
                name: "format".into(),
                param_type: "string".into(),
                description: "Output format: 'iso', 'human', or 'unix'".into(),
                required: false,
                default: Some(json!("human")),
                enum_values: Some(vec![json!("iso"), json!("human"), json!("unix")]),
            }],
            category: Some("time".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let format = call
            .arguments
            .get("format")
            .and_then(|v| v.as_str())
            .unwrap_or("human");

        let now = chrono::Utc::now();

        let output = match format {
            "iso" => now.to_rfc3339(),
            "unix" => now.timestamp().to_string(),
            _ => now.format("%A, %B %d, %Y at %H:%M:%S UTC").to_string(),
        };

        Ok(ToolResult::success("datetime", output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentry_core::tool::{ToolCollection, ToolOutcome};

    fn call(args: &[(&str, &str)]) -> ToolCall {
        ToolCall::new(
            "datetime",
            args.iter().map(|(k, v)| ((*k).to_string(), json!(v))),
        )
    }

    #[tokio::test]
    async fn iso_output_parses_back() {
        let result = DateTimeTool.execute(&call(&[("format", "iso")])).await.unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&result.output).is_ok());
    }

    #[tokio::test]
    async fn unix_output_is_numeric() {
        let result = DateTimeTool.execute(&call(&[("format", "unix")])).await.unwrap();
        assert!(result.output.parse::<i64>().is_ok());
    }

    #[tokio::test]
    async fn format_defaults_to_human() {
        let result = DateTimeTool.execute(&call(&[])).await.unwrap();
        assert!(result.output.contains("UTC"));
    }

    #[tokio::test]
    async fn enumerated_format_is_enforced_by_the_collection() {
        let mut collection = ToolCollection::new();
        collection.register_tool(DateTimeTool);

        let outcome = collection.execute_tool(&call(&[("format", "martian")])).await;
        match outcome {
            ToolOutcome::Error { error } => assert_eq!(error, "Invalid input for tool datetime"),
            ToolOutcome::Success { .. } => panic!("expected error"),
        }
    }
}
