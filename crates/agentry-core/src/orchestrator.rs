//! Task Orchestration
//!
//! Routes incoming tasks to single-agent or multi-agent execution,
//! keeps a task history, and owns the session that carries conversation
//! context between tasks.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message, Role};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::reasoning::{Agent, AgentConfig};
use crate::session::Session;
use crate::tool::ToolCollection;

/// How a task is executed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One agent, one reasoning loop
    Single,
    /// Role-specialized pipeline (planner, executor, critic)
    Multi,
    /// Pick per task from its wording
    Auto,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Single => write!(f, "single"),
            ExecutionMode::Multi => write!(f, "multi"),
            ExecutionMode::Auto => write!(f, "auto"),
        }
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(ExecutionMode::Single),
            "multi" => Ok(ExecutionMode::Multi),
            "auto" => Ok(ExecutionMode::Auto),
            other => Err(AgentError::Parse(format!("unknown mode: {other}"))),
        }
    }
}

const RESEARCH_KEYWORDS: &[&str] = &[
    "research",
    "find",
    "search",
    "look up",
    "investigate",
    "analyze",
    "study",
    "explore",
    "learn about",
];

const CALC_KEYWORDS: &[&str] = &[
    "calculate",
    "compute",
    "solve",
    "evaluate",
    "what is",
    "how much",
    "add",
    "subtract",
    "multiply",
    "divide",
];

const CREATIVE_KEYWORDS: &[&str] = &[
    "create", "generate", "write", "compose", "design", "develop", "make", "build", "draft",
];

/// Pick an execution mode from the task wording.
///
/// Categories are checked in order and a later match overrides an earlier
/// one: research-flavored tasks lean multi, calculation-flavored single,
/// creative-flavored multi again. Anything else runs single.
pub fn detect_mode(task: &str) -> ExecutionMode {
    let task = task.to_lowercase();
    let mut mode = ExecutionMode::Single;

    if RESEARCH_KEYWORDS.iter().any(|k| has_keyword(&task, k)) {
        mode = ExecutionMode::Multi;
    }
    if CALC_KEYWORDS.iter().any(|k| has_keyword(&task, k)) {
        mode = ExecutionMode::Single;
    }
    if CREATIVE_KEYWORDS.iter().any(|k| has_keyword(&task, k)) {
        mode = ExecutionMode::Multi;
    }

    mode
}

/// Whole-word (and whole-phrase) containment check.
fn has_keyword(haystack: &str, keyword: &str) -> bool {
    let mut search_from = 0;
    while let Some(pos) = haystack[search_from..].find(keyword) {
        let start = search_from + pos;
        let end = start + keyword.len();
        let before_ok = start == 0
            || !haystack[..start]
                .chars()
                .next_back()
                .is_some_and(char::is_alphanumeric);
        let after_ok = end == haystack.len()
            || !haystack[end..].chars().next().is_some_and(char::is_alphanumeric);
        if before_ok && after_ok {
            return true;
        }
        search_from = end;
    }
    false
}

/// Record of one executed task
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Original task text
    pub task: String,

    /// Mode the task actually ran in
    pub mode: ExecutionMode,

    /// Final answer
    pub answer: String,

    /// Reasoning iterations consumed
    pub iterations: usize,

    /// When execution started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

/// Descriptor of an agent managed by the orchestrator
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentInfo {
    pub name: String,
    pub role: String,
    pub primary: bool,
}

/// Orchestrator configuration
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Agent display name
    pub name: String,

    /// Mode used when the caller does not pick one
    pub default_mode: ExecutionMode,

    /// Per-agent reasoning iteration cap
    pub max_iterations: usize,

    /// Generation options shared by every role
    pub generation: GenerationOptions,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            name: "agentry".into(),
            default_mode: ExecutionMode::Single,
            max_iterations: 10,
            generation: GenerationOptions::default(),
        }
    }
}

const PLANNER_PROMPT: &str = "You are the planner agent. Break the task into a short numbered \
list of concrete steps. Do not execute anything; output only the plan.";

const CRITIC_PROMPT: &str = "You are the critic agent. You receive a task and a draft answer. \
Point out and silently fix any errors or gaps, then output only the final improved answer.";

const ROLES: &[&str] = &["planner", "executor", "critic"];

/// Coordinates agents and manages task execution.
///
/// Owns the provider, the tool collection, the session carrying
/// conversation context across tasks, and the task history.
pub struct Orchestrator {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolCollection>,
    config: OrchestratorConfig,
    session: Session,
    history: Vec<TaskRecord>,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolCollection>,
        config: OrchestratorConfig,
    ) -> Self {
        tracing::info!(agent = %config.name, mode = %config.default_mode, "Orchestrator initialized");
        Self {
            provider,
            tools,
            config,
            session: Session::new(),
            history: Vec::new(),
        }
    }

    /// Execute a task, routing by mode.
    ///
    /// `mode: None` falls back to the configured default; `Auto` resolves
    /// per task via [`detect_mode`].
    pub async fn execute_task(
        &mut self,
        task: &str,
        mode: Option<ExecutionMode>,
    ) -> Result<TaskRecord> {
        let mut mode = mode.unwrap_or(self.config.default_mode);
        if mode == ExecutionMode::Auto {
            mode = detect_mode(task);
        }

        let started_at = Utc::now();
        let clock = Instant::now();

        match mode {
            ExecutionMode::Multi => {
                tracing::info!(task, "Expanding to multiple agents");
            }
            _ => tracing::info!(task, "Processing task"),
        }

        let reply = match mode {
            ExecutionMode::Multi => self.run_multi(task).await?,
            _ => self.run_single(task).await?,
        };

        let duration_ms = clock.elapsed().as_millis() as u64;
        tracing::info!(duration_ms, iterations = reply.iterations, "Task completed");

        // Log the exchange into the session for cross-task context.
        self.session.conversation.push(Message::user(task));
        self.session
            .conversation
            .push(Message::assistant(&reply.answer));
        self.session.touch();

        let record = TaskRecord {
            task: task.to_string(),
            mode,
            answer: reply.answer,
            iterations: reply.iterations,
            started_at,
            duration_ms,
        };
        self.history.push(record.clone());

        Ok(record)
    }

    /// Single mode: one agent, one reasoning loop, with tools.
    async fn run_single(&self, task: &str) -> Result<crate::reasoning::AgentReply> {
        let agent = self.executor_agent(format!(
            "You are {}, a helpful AI assistant.",
            self.config.name
        ));

        let mut conversation = self.seeded_conversation();
        conversation.push(Message::user(task));
        agent.run(&mut conversation).await
    }

    /// Multi mode: planner decomposes, executor works the plan with
    /// tools, critic produces the final answer.
    async fn run_multi(&self, task: &str) -> Result<crate::reasoning::AgentReply> {
        let plan = self.complete_role(PLANNER_PROMPT, task).await?;
        tracing::debug!(plan = %plan, "Planner produced a plan");

        let agent = self.executor_agent(
            "You are the executor agent. Work through the plan step by step, \
             using tools where they help, and report the combined outcome."
                .to_string(),
        );
        let mut conversation = self.seeded_conversation();
        conversation.push(Message::user(format!(
            "{task}\n\nWork from this plan:\n{plan}"
        )));
        let executed = agent.run(&mut conversation).await?;

        let critique_input = format!(
            "Task:\n{task}\n\nDraft answer:\n{}",
            executed.answer
        );
        let answer = self.complete_role(CRITIC_PROMPT, &critique_input).await?;

        Ok(crate::reasoning::AgentReply {
            answer,
            iterations: executed.iterations,
        })
    }

    /// One-shot role completion without tools (planner, critic).
    async fn complete_role(&self, role_prompt: &str, input: &str) -> Result<String> {
        let messages = vec![Message::system(role_prompt), Message::user(input)];
        let completion = self
            .provider
            .complete(&messages, &self.config.generation)
            .await?;
        Ok(completion.content)
    }

    fn executor_agent(&self, system_prompt: String) -> Agent {
        Agent::new(
            Arc::clone(&self.provider),
            Arc::clone(&self.tools),
            AgentConfig {
                system_prompt,
                max_iterations: self.config.max_iterations,
                generation: self.config.generation.clone(),
                inject_tool_descriptions: true,
            },
        )
    }

    /// A working conversation seeded with the session's recent exchanges
    /// (system prompts excluded; the agent installs its own).
    fn seeded_conversation(&self) -> Conversation {
        let mut conversation = Conversation::new();
        for message in self.session.conversation.messages() {
            if message.role != Role::System {
                conversation.push(message.clone());
            }
        }
        conversation
    }

    /// Most recent task records, oldest first.
    pub fn task_history(&self, limit: usize) -> &[TaskRecord] {
        let start = self.history.len().saturating_sub(limit);
        &self.history[start..]
    }

    /// Result of the last executed task.
    pub fn last_result(&self) -> Option<&TaskRecord> {
        self.history.last()
    }

    /// Agents this orchestrator manages: the primary agent plus the
    /// specialized roles engaged in multi mode.
    pub fn list_agents(&self) -> Vec<AgentInfo> {
        let mut agents = vec![AgentInfo {
            name: self.config.name.clone(),
            role: "primary".into(),
            primary: true,
        }];

        if self.config.default_mode != ExecutionMode::Single {
            for role in ROLES {
                agents.push(AgentInfo {
                    name: format!("{role}-agent"),
                    role: (*role).to_string(),
                    primary: false,
                });
            }
        }

        agents
    }

    pub fn tools(&self) -> &ToolCollection {
        &self.tools
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Completion, FinishReason, ModelInfo, ProviderInfo};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedProvider {
        responses: Mutex<VecDeque<String>>,
    }

    impl ScriptedProvider {
        fn new(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().map(|s| (*s).to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn info(&self) -> crate::Result<ProviderInfo> {
            Ok(ProviderInfo {
                name: "Scripted".into(),
                version: None,
                models: Vec::new(),
                supports_tools: false,
            })
        }

        async fn health_check(&self) -> crate::Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerationOptions,
        ) -> crate::Result<Completion> {
            let content = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| AgentError::Provider("script exhausted".into()))?;
            Ok(Completion {
                content,
                model: options.model.clone(),
                usage: None,
                finish_reason: Some(FinishReason::Stop),
            })
        }

        async fn list_models(&self) -> crate::Result<Vec<ModelInfo>> {
            Ok(Vec::new())
        }
    }

    fn orchestrator(script: &[&str], default_mode: ExecutionMode) -> Orchestrator {
        Orchestrator::new(
            Arc::new(ScriptedProvider::new(script)),
            Arc::new(ToolCollection::new()),
            OrchestratorConfig {
                default_mode,
                ..OrchestratorConfig::default()
            },
        )
    }

    #[test]
    fn research_tasks_go_multi() {
        assert_eq!(
            detect_mode("research quantum computing"),
            ExecutionMode::Multi
        );
        assert_eq!(detect_mode("look up the capital of France"), ExecutionMode::Multi);
    }

    #[test]
    fn calculation_tasks_go_single() {
        assert_eq!(detect_mode("calculate 2 + 2"), ExecutionMode::Single);
        assert_eq!(detect_mode("what is 7 times 6"), ExecutionMode::Single);
    }

    #[test]
    fn creative_overrides_calculation() {
        // "write" outranks "compute" because the creative pass runs last.
        assert_eq!(
            detect_mode("compute nothing, just write a poem"),
            ExecutionMode::Multi
        );
    }

    #[test]
    fn keyword_match_respects_word_boundaries() {
        // "finding" must not trigger the "find" keyword.
        assert_eq!(detect_mode("refine the findings"), ExecutionMode::Single);
        assert_eq!(detect_mode("unrelated chatter"), ExecutionMode::Single);
    }

    #[test]
    fn mode_round_trips_through_strings() {
        assert_eq!("multi".parse::<ExecutionMode>().unwrap(), ExecutionMode::Multi);
        assert_eq!(ExecutionMode::Auto.to_string(), "auto");
        assert!("bogus".parse::<ExecutionMode>().is_err());
    }

    #[tokio::test]
    async fn single_mode_records_history() {
        let mut orch = orchestrator(&["The answer is 4."], ExecutionMode::Single);

        let record = orch.execute_task("what is 2 + 2", None).await.unwrap();
        assert_eq!(record.answer, "The answer is 4.");
        assert_eq!(record.mode, ExecutionMode::Single);
        assert_eq!(record.iterations, 1);

        assert_eq!(orch.task_history(10).len(), 1);
        assert_eq!(orch.last_result().unwrap().answer, "The answer is 4.");
        // Session logged the exchange.
        assert_eq!(orch.session().message_count(), 2);
    }

    #[tokio::test]
    async fn multi_mode_runs_planner_executor_critic() {
        let mut orch = orchestrator(
            &[
                "1. Gather facts\n2. Summarize",
                "Draft: quantum computers use qubits.",
                "Quantum computers use qubits to run certain algorithms faster.",
            ],
            ExecutionMode::Single,
        );

        let record = orch
            .execute_task("research quantum computing", Some(ExecutionMode::Multi))
            .await
            .unwrap();
        assert_eq!(record.mode, ExecutionMode::Multi);
        assert_eq!(
            record.answer,
            "Quantum computers use qubits to run certain algorithms faster."
        );
    }

    #[tokio::test]
    async fn auto_mode_detects_per_task() {
        let mut orch = orchestrator(&["Four."], ExecutionMode::Auto);

        let record = orch.execute_task("calculate 2 + 2", None).await.unwrap();
        assert_eq!(record.mode, ExecutionMode::Single);
    }

    #[tokio::test]
    async fn session_context_carries_between_tasks() {
        let mut orch = orchestrator(&["Alice.", "Yes, Alice."], ExecutionMode::Single);

        orch.execute_task("My name is Alice, who am I?", None)
            .await
            .unwrap();
        orch.execute_task("Still remember?", None).await.unwrap();

        // user + assistant per task
        assert_eq!(orch.session().message_count(), 4);
        assert_eq!(orch.task_history(1).len(), 1);
        assert_eq!(orch.task_history(5).len(), 2);
    }

    #[test]
    fn agent_listing_marks_primary() {
        let orch = orchestrator(&[], ExecutionMode::Multi);
        let agents = orch.list_agents();
        assert!(agents[0].primary);
        assert_eq!(agents.len(), 1 + ROLES.len());

        let single = orchestrator(&[], ExecutionMode::Single);
        assert_eq!(single.list_agents().len(), 1);
    }
}
