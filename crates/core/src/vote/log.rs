use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// One inbound group message. A vote click arrives as a message whose text
/// equals the selector token of the tapped button.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMessage {
    pub group_id: String,
    pub sender: String,
    pub text: String,
}

impl GroupMessage {
    pub fn new(
        group_id: impl Into<String>,
        sender: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self { group_id: group_id.into(), sender: sender.into(), text: text.into() }
    }
}

/// Append-only, ordered log of inbound group messages for the process
/// lifetime. Messages are never mutated or removed.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: RwLock<Vec<GroupMessage>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, message: GroupMessage) {
        self.messages.write().expect("message log lock poisoned").push(message);
    }

    /// Messages belonging to `group_id`, in arrival order.
    pub fn for_group(&self, group_id: &str) -> Vec<GroupMessage> {
        self.messages
            .read()
            .expect("message log lock poisoned")
            .iter()
            .filter(|message| message.group_id == group_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.read().expect("message log lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
