use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// The system prompt seeded into every conversation. The agent is a strict
/// translator: it extracts arguments verbatim and never invents missing ones.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. STRICTLY follow these rules:\n\n1. TOOL CALLING RULES:\n   - For group_id: ALWAYS extract and use group_id if the user provides it; if missing, ask for it.\n   - For vote titles: USE THE USER'S EXACT WORDS without modification\n   - NEVER shorten, rephrase or generate new titles\n   - If title is missing, ASK USER - don't create one\n   - For vote options: ONLY use options explicitly provided by user\n\n2. GENERAL RULES:\n   - Preserve ALL user-provided text verbatim\n   - Respond in the user's language\n   - Don't assume missing arguments\n   - Ask for clarification when needed";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Append-only conversation history, seeded with the system prompt and
/// growing for the process lifetime. No pruning or windowing.
#[derive(Debug)]
pub struct ConversationHistory {
    turns: RwLock<Vec<Turn>>,
}

impl ConversationHistory {
    pub fn new(system_prompt: &str) -> Self {
        Self { turns: RwLock::new(vec![Turn::system(system_prompt)]) }
    }

    pub fn append_user(&self, content: &str) {
        self.turns.write().expect("conversation lock poisoned").push(Turn::user(content));
    }

    pub fn append_assistant(&self, content: &str) {
        self.turns.write().expect("conversation lock poisoned").push(Turn::assistant(content));
    }

    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.read().expect("conversation lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.turns.read().expect("conversation lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(SYSTEM_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConversationHistory, Role};

    #[test]
    fn history_starts_with_the_system_prompt() {
        let history = ConversationHistory::default();
        let turns = history.snapshot();

        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, Role::System);
        assert!(turns[0].content.contains("TOOL CALLING RULES"));
    }

    #[test]
    fn appended_turns_keep_their_order() {
        let history = ConversationHistory::default();
        history.append_user("book a table");
        history.append_assistant("Which city?");
        history.append_user("London");

        let turns = history.snapshot();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[1].role, Role::User);
        assert_eq!(turns[2].role, Role::Assistant);
        assert_eq!(turns[3].content, "London");
    }
}
