//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern for agent behavior.
//! The agent observes, thinks, acts (via tools), and responds.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message, Role};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolCollection, ToolOutcome};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt template
    pub system_prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// Whether to append tool descriptions to system prompt
    pub inject_tool_descriptions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
            inject_tool_descriptions: true,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful AI assistant.

When you need to use a tool, respond with a JSON block in this exact format:
```tool
{"tool": "tool_name", "arguments": {"arg1": "value1"}}
```

After receiving tool results, synthesize them into a helpful response.
If you can answer directly without tools, do so.
Be concise and accurate."#;

/// Outcome of one agent run
#[derive(Clone, Debug)]
pub struct AgentReply {
    /// Final synthesized answer
    pub answer: String,

    /// Completions consumed to reach it
    pub iterations: usize,
}

/// A single reasoning agent: one provider, one tool collection, one prompt.
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolCollection>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolCollection>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, tools: Arc<ToolCollection>) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Build the full system prompt including tool descriptions
    fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();

        if self.config.inject_tool_descriptions && !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
        }

        prompt
    }

    /// Run the agent on a conversation until it produces a tool-free
    /// response or runs out of iterations.
    pub async fn run(&self, conversation: &mut Conversation) -> Result<AgentReply> {
        // Ensure system prompt is set
        if conversation.messages().first().map(|m| &m.role) != Some(&Role::System) {
            let messages = conversation.messages_mut();
            messages.insert(0, Message::system(self.build_system_prompt()));
        }

        let mut iterations = 0;

        loop {
            iterations += 1;

            if iterations > self.config.max_iterations {
                return Err(AgentError::MaxIterations(self.config.max_iterations));
            }

            conversation.truncate_to_fit();

            // Get completion from provider
            let completion = self
                .provider
                .complete(conversation.messages(), &self.config.generation)
                .await?;

            let content = completion.content.clone();

            // Add assistant response to conversation
            conversation.push(Message::assistant(&content));

            // Check for tool calls
            if let Some(tool_call) = parse_tool_call(&content) {
                tracing::debug!(tool = %tool_call.name, "Executing tool");

                let outcome = self.tools.execute_tool(&tool_call).await;

                // Feed the envelope back as a tool message
                let tool_message = format_tool_outcome(&tool_call, &outcome);
                conversation.push(Message::tool(tool_message, tool_call.id.clone()));

                // Continue reasoning loop
                continue;
            }

            // No tool call - this is the final response
            return Ok(AgentReply {
                answer: content,
                iterations,
            });
        }
    }

    /// Run with a simple string input (creates temporary conversation)
    pub async fn ask(&self, question: &str) -> Result<AgentReply> {
        let mut conversation = Conversation::with_system_prompt(self.build_system_prompt());
        conversation.push(Message::user(question));
        self.run(&mut conversation).await
    }

    /// Get the tool collection
    pub fn tools(&self) -> &ToolCollection {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Parse a tool call from an LLM response.
///
/// Looks for a ```tool fenced block first, then falls back to inline JSON
/// with a "tool" key.
pub(crate) fn parse_tool_call(content: &str) -> Option<ToolCall> {
    let tool_start = "```tool";
    let tool_end = "```";

    if let Some(start_idx) = content.find(tool_start) {
        let after_marker = &content[start_idx + tool_start.len()..];
        if let Some(end_idx) = after_marker.find(tool_end) {
            let json_str = after_marker[..end_idx].trim();

            if let Ok(mut call) = serde_json::from_str::<WireToolCall>(json_str) {
                if call.id.is_none() {
                    call.id = Some(uuid::Uuid::new_v4().to_string());
                }
                return Some(call.into());
            }
        }
    }

    parse_inline_tool_call(content)
}

/// Try to parse inline JSON tool call
fn parse_inline_tool_call(content: &str) -> Option<ToolCall> {
    if !content.contains(r#""tool""#) {
        return None;
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;

    if end <= start {
        return None;
    }

    let json_str = &content[start..=end];
    serde_json::from_str::<WireToolCall>(json_str)
        .ok()
        .map(Into::into)
}

/// The wire shape the model emits: `{"tool": ..., "arguments": {...}}`.
#[derive(serde::Deserialize)]
struct WireToolCall {
    tool: String,
    #[serde(default)]
    arguments: std::collections::HashMap<String, serde_json::Value>,
    #[serde(default)]
    id: Option<String>,
}

impl From<WireToolCall> for ToolCall {
    fn from(wire: WireToolCall) -> Self {
        ToolCall {
            name: wire.tool,
            arguments: wire.arguments,
            id: wire.id,
        }
    }
}

/// Format a tool outcome for injection into the conversation
fn format_tool_outcome(call: &ToolCall, outcome: &ToolOutcome) -> String {
    match outcome {
        ToolOutcome::Success { result } => {
            let text = match result {
                serde_json::Value::String(s) => s.clone(),
                other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
            };
            format!("[Tool '{}' returned]\n{}", call.name, text)
        }
        ToolOutcome::Error { error } => {
            format!("[Tool '{}' failed]\n{}", call.name, error)
        }
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolCollection,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolCollection::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register_tool(tool);
        self
    }

    pub fn tools(mut self, tools: ToolCollection) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}
