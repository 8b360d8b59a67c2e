//! Provider-agnostic chat-model integration and the agent abstraction.
//!
//! This crate exposes a common [`traits::ChatModel`] interface with one
//! concrete OpenAI-compatible implementation, a [`tool::Tool`] trait for
//! callable capabilities, and [`agent::Agent`], which pairs a model with a
//! fixed instruction set and zero or more tools and drives the tool-calling
//! loop to a final text answer.
//!
//! # Examples
//! ```no_run
//! use std::sync::Arc;
//! use tubelens_llm::agent::Agent;
//! use tubelens_llm::openai::OpenAiChatModel;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let model = OpenAiChatModel::new("sk-...".into(), "gpt-4o".into())?;
//! let agent = Agent::new(Arc::new(model), "You summarise things.".into());
//! let reply = agent.run("Summarise: water is wet.").await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod openai;
pub mod tool;
pub mod traits;

pub use agent::{Agent, AgentError, AgentReply};
pub use openai::OpenAiChatModel;
pub use tool::{Tool, ToolError};
pub use traits::{ChatMessage, ChatModel, ChatRequest, LlmError, ModelTurn, Role, ToolCall, ToolSpec};

/// Default model recommendation for video analysis.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
