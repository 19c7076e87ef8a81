//! # agentry-runtime
//!
//! Runtime LLM providers for the agentry framework.
//!
//! ## Providers
//!
//! - **Ollama**: local inference over the Ollama HTTP API
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agentry_runtime::OllamaProvider;
//!
//! let provider = OllamaProvider::from_env();
//! if provider.health_check().await? {
//!     // ready to serve completions
//! }
//! ```

pub mod ollama;

pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use agentry_core::{
    Agent, AgentError, LlmProvider, Message, Orchestrator, Result, Role, Session, Tool,
    ToolCollection,
};
