//! The seam to the external language-model tool-calling runtime.
//!
//! The runtime is an opaque collaborator: handed the conversation so far, it
//! returns an ordered sequence of messages, some of which carry structured
//! tool-call requests. Nothing here interprets model output beyond that.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::conversation::Turn;

/// One structured tool-call request embedded in an agent message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub name: String,
    pub args: Map<String, Value>,
}

impl ToolCallRequest {
    pub fn new(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self { name: name.into(), args }
    }
}

/// One message in the agent's response sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMessage {
    pub text: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,
}

impl AgentMessage {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self { text: text.into(), tool_calls: Vec::new() }
    }

    pub fn with_tool_call(call: ToolCallRequest) -> Self {
        Self { text: String::new(), tool_calls: vec![call] }
    }
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent runtime failure: {0}")]
    Runtime(String),
}

#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn invoke(&self, conversation: &[Turn]) -> Result<Vec<AgentMessage>, AgentError>;
}

/// Trivial client used in wiring and tests: echoes the latest user turn with
/// no tool calls, so every response takes the passthrough path.
#[derive(Debug, Default)]
pub struct EchoAgentClient;

#[async_trait]
impl AgentClient for EchoAgentClient {
    async fn invoke(&self, conversation: &[Turn]) -> Result<Vec<AgentMessage>, AgentError> {
        let latest = conversation
            .iter()
            .rev()
            .find(|turn| matches!(turn.role, crate::conversation::Role::User))
            .map(|turn| turn.content.clone())
            .unwrap_or_default();
        Ok(vec![AgentMessage::text_only(format!("received: {latest}"))])
    }
}

#[cfg(test)]
mod tests {
    use super::{AgentClient, EchoAgentClient};
    use crate::conversation::Turn;

    #[tokio::test]
    async fn echo_client_replays_latest_user_turn() {
        let client = EchoAgentClient;
        let conversation =
            vec![Turn::system("prompt"), Turn::user("hello"), Turn::assistant("hi"), Turn::user("book a cab")];

        let messages = client.invoke(&conversation).await.expect("echo never fails");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "received: book a cab");
        assert!(messages[0].tool_calls.is_empty());
    }
}
