//! The per-turn parameter-completion loop.
//!
//! After every agent invocation the dispatcher merges the tool-call
//! arguments seen across the turn, decides whether the active tool has
//! everything it needs, and synthesizes exactly one user-visible response:
//! a clarification request, a tool confirmation, or the agent's own text.

use std::sync::Arc;

use concierge_core::tools::{is_excluded, spec_for, ToolArgs, Toolbox};
use concierge_core::UserMessenger;
use tracing::{info, warn};

use crate::conversation::ConversationHistory;
use crate::llm::{AgentClient, AgentMessage};

const AGENT_UNAVAILABLE: &str =
    "The assistant is temporarily unavailable. Please try again in a moment.";

pub struct TurnDispatcher {
    history: Arc<ConversationHistory>,
    agent: Arc<dyn AgentClient>,
    toolbox: Arc<Toolbox>,
    users: Arc<dyn UserMessenger>,
}

impl TurnDispatcher {
    pub fn new(
        history: Arc<ConversationHistory>,
        agent: Arc<dyn AgentClient>,
        toolbox: Arc<Toolbox>,
        users: Arc<dyn UserMessenger>,
    ) -> Self {
        Self { history, agent, toolbox, users }
    }

    /// Runs one full turn for an inbound user message and returns the
    /// synthesized response. Errors never escape a turn: agent and tool
    /// failures become user-visible text, send failures are logged.
    pub async fn handle_user_message(&self, user_id: &str, text: &str) -> String {
        info!(event_name = "dispatch.turn.received", user_id = %user_id, "user message received");
        self.history.append_user(text);

        let response = match self.agent.invoke(&self.history.snapshot()).await {
            Ok(messages) => self.synthesize_response(&messages).await,
            Err(error) => {
                warn!(
                    event_name = "dispatch.agent.failed",
                    user_id = %user_id,
                    error = %error,
                    "agent invocation failed"
                );
                AGENT_UNAVAILABLE.to_owned()
            }
        };

        self.history.append_assistant(&response);
        if let Err(error) = self.users.send_to_user(user_id, &response).await {
            warn!(
                event_name = "dispatch.notify.failed",
                user_id = %user_id,
                error = %error,
                "user notification failed"
            );
        }

        response
    }

    async fn synthesize_response(&self, messages: &[AgentMessage]) -> String {
        let (active_tool, args) = collect_tool_calls(messages);

        let Some(tool_name) = active_tool else {
            return passthrough(messages);
        };
        if is_excluded(&tool_name) {
            return passthrough(messages);
        }
        let Some(spec) = spec_for(&tool_name) else {
            return passthrough(messages);
        };

        let missing = args.missing_for(spec);
        if !missing.is_empty() {
            info!(
                event_name = "dispatch.tool.incomplete",
                tool = %tool_name,
                missing = %missing.join(","),
                "asking user for missing parameters"
            );
            return format!(
                "Got partial info for `{tool_name}`. Please provide: {}",
                missing.join(", ")
            );
        }

        match self.toolbox.invoke(&tool_name, &args).await {
            Ok(confirmation) => {
                info!(event_name = "dispatch.tool.executed", tool = %tool_name, "tool executed");
                confirmation
            }
            Err(error) => {
                warn!(
                    event_name = "dispatch.tool.failed",
                    tool = %tool_name,
                    error = %error,
                    "tool execution failed"
                );
                format!("❌ Error executing {tool_name}: {error}")
            }
        }
    }
}

/// Merges every tool call seen across the turn. Arguments accumulate with
/// later calls overwriting earlier ones; the last tool name seen is the
/// active tool.
fn collect_tool_calls(messages: &[AgentMessage]) -> (Option<String>, ToolArgs) {
    let mut active_tool = None;
    let mut args = ToolArgs::default();

    for message in messages {
        for call in &message.tool_calls {
            active_tool = Some(call.name.clone());
            args.merge(&call.args);
        }
    }

    (active_tool, args)
}

fn passthrough(messages: &[AgentMessage]) -> String {
    messages.last().map(|message| message.text.clone()).unwrap_or_default()
}
