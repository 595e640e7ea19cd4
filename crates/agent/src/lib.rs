//! Agent runtime - conversation state and the tool-dispatch loop
//!
//! This crate owns the conversational side of concierge:
//! - **Conversation history** (`conversation`) - append-only `{role, content}`
//!   turns, seeded with the system prompt
//! - **Agent seam** (`llm`) - the opaque LLM tool-calling runtime behind
//!   `AgentClient`
//! - **Turn dispatch** (`dispatcher`) - merge tool-call arguments, gate on
//!   required parameters, execute-and-format or ask for more
//!
//! # Safety Principle
//!
//! The LLM is strictly a translator. It never books anything itself; every
//! fulfillment runs through the typed tool registry in `concierge-core`
//! after the dispatcher has verified the required parameters.

pub mod conversation;
pub mod dispatcher;
pub mod llm;

pub use conversation::{ConversationHistory, Role, Turn, SYSTEM_PROMPT};
pub use dispatcher::TurnDispatcher;
pub use llm::{AgentClient, AgentError, AgentMessage, EchoAgentClient, ToolCallRequest};
