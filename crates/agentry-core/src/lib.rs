//! # agentry-core
//!
//! Core agent logic: a provider-agnostic LLM abstraction, an extensible
//! tool collection with a uniform execution envelope, and task
//! orchestration across single- and multi-agent modes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Orchestrator                            │
//! │  ┌─────────────┐  ┌────────────────┐  ┌──────────────────┐  │
//! │  │  Reasoning  │  │ ToolCollection │  │   LlmProvider    │  │
//! │  │    Loop     │──│  (instances +  │──│   (Strategy)     │  │
//! │  │             │  │  lazy classes) │  │                  │  │
//! │  └─────────────┘  └────────────────┘  └──────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every tool invocation flows through the same resolve → validate →
//! execute pipeline and comes back as a [`tool::ToolOutcome`] envelope,
//! whatever tool ran and however it failed.

pub mod error;
pub mod message;
pub mod orchestrator;
pub mod provider;
pub mod reasoning;
pub mod session;
pub mod tool;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use orchestrator::{
    detect_mode, AgentInfo, ExecutionMode, Orchestrator, OrchestratorConfig, TaskRecord,
};
pub use provider::{GenerationOptions, LlmProvider};
pub use reasoning::{Agent, AgentBuilder, AgentReply};
pub use session::{Session, SessionId};
pub use tool::{
    CatalogEntry, Tool, ToolCall, ToolCatalog, ToolClass, ToolCollection, ToolOutcome, ToolResult,
    ToolSchema,
};
