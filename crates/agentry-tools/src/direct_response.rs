//! Direct Response Tool
//!
//! Handles creative tasks (poems, stories, essays, ...) by classifying the
//! request and delegating to the language model with a role-specific
//! system prompt. Wraps a provider handle, so it is instance-registered.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use agentry_core::error::{AgentError, Result};
use agentry_core::message::Message;
use agentry_core::provider::{GenerationOptions, LlmProvider};
use agentry_core::tool::{ParameterSchema, Tool, ToolCall, ToolResult, ToolSchema};

const CREATIVE_KEYWORDS: &[&str] = &[
    "write",
    "compose",
    "create",
    "generate",
    "draft",
    "poem",
    "story",
    "essay",
    "article",
    "letter",
    "song",
    "lyrics",
    "script",
    "dialogue",
    "narrative",
    "fiction",
    "creative",
    "imagine",
    "fantasy",
];

/// Creative-content generation tool
pub struct DirectResponseTool {
    provider: Arc<dyn LlmProvider>,
    generation: GenerationOptions,
}

impl DirectResponseTool {
    pub fn new(provider: Arc<dyn LlmProvider>, generation: GenerationOptions) -> Self {
        Self {
            provider,
            generation,
        }
    }

    fn is_creative_task(prompt: &str) -> bool {
        let lowered = prompt.to_lowercase();
        CREATIVE_KEYWORDS.iter().any(|keyword| {
            lowered
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word == *keyword)
        })
    }

    fn task_type(prompt: &str) -> &'static str {
        let lowered = prompt.to_lowercase();
        if lowered.contains("poem") {
            "poem"
        } else if lowered.contains("story") {
            "story"
        } else if lowered.contains("essay") {
            "essay"
        } else if lowered.contains("article") {
            "article"
        } else if lowered.contains("letter") {
            "letter"
        } else if lowered.contains("song") || lowered.contains("lyrics") {
            "song"
        } else if lowered.contains("script") {
            "script"
        } else if lowered.contains("dialogue") {
            "dialogue"
        } else {
            "creative text"
        }
    }

    fn role_prompt(task_type: &str) -> String {
        let role = match task_type {
            "poem" => "a skilled poet",
            "story" => "a talented storyteller",
            "essay" => "an insightful essayist",
            "article" => "a professional journalist",
            "letter" => "a skilled letter writer",
            "song" => "a talented songwriter",
            "script" => "an experienced screenwriter",
            "dialogue" => "a skilled dialogue writer",
            _ => "a creative writer",
        };
        format!(
            "You are {role}. Fulfill the user's request thoughtfully and expressively, \
             producing only the requested {task_type}."
        )
    }
}

#[async_trait]
impl Tool for DirectResponseTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "direct_response".into(),
            description: "Generate creative content like poems, stories, and other text".into(),
            parameters: vec![ParameterSchema {
                name: "prompt".into(),
                param_type: "string".into(),
                description: "The creative task to perform".into(),
                required: true,
                default: None,
                enum_values: None,
            }],
            category: Some("creative".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let prompt = call
            .arguments
            .get("prompt")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::ToolValidation("Missing prompt".into()))?;

        if !Self::is_creative_task(prompt) {
            return Ok(ToolResult::failure(
                "direct_response",
                "This doesn't seem to be a creative task. Please try a different tool.",
            ));
        }

        let task_type = Self::task_type(prompt);
        let messages = vec![
            Message::system(Self::role_prompt(task_type)),
            Message::user(prompt),
        ];

        let completion = self.provider.complete(&messages, &self.generation).await?;

        Ok(
            ToolResult::success("direct_response", completion.content)
                .with_data(json!({ "task_type": task_type })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentry_core::provider::{Completion, FinishReason, ModelInfo, ProviderInfo};

    struct CannedProvider(String);

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn info(&self) -> Result<ProviderInfo> {
            Ok(ProviderInfo {
                name: "Canned".into(),
                version: None,
                models: Vec::new(),
                supports_tools: false,
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            Ok(Completion {
                content: self.0.clone(),
                model: options.model.clone(),
                usage: None,
                finish_reason: Some(FinishReason::Stop),
            })
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(Vec::new())
        }
    }

    fn tool(reply: &str) -> DirectResponseTool {
        DirectResponseTool::new(
            Arc::new(CannedProvider(reply.into())),
            GenerationOptions::default(),
        )
    }

    fn call(prompt: &str) -> ToolCall {
        ToolCall::new(
            "direct_response",
            [("prompt".to_string(), json!(prompt))],
        )
    }

    #[test]
    fn classifies_task_types() {
        assert_eq!(DirectResponseTool::task_type("write a poem about rust"), "poem");
        assert_eq!(DirectResponseTool::task_type("draft song lyrics"), "song");
        assert_eq!(DirectResponseTool::task_type("imagine something"), "creative text");
    }

    #[test]
    fn keyword_detection_uses_whole_words() {
        assert!(DirectResponseTool::is_creative_task("write a story"));
        // "rewrite" contains "write" but is not the keyword itself.
        assert!(!DirectResponseTool::is_creative_task("rewritten summary"));
    }

    #[tokio::test]
    async fn creative_prompt_delegates_to_provider() {
        let result = tool("Roses are red...")
            .execute(&call("write a poem about the sea"))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, "Roses are red...");
        assert_eq!(result.data, Some(json!({ "task_type": "poem" })));
    }

    #[tokio::test]
    async fn non_creative_prompt_is_refused() {
        let result = tool("unused")
            .execute(&call("sum the numbers 1 to 10"))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.output.contains("creative task"));
    }
}
