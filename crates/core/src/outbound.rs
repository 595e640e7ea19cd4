//! Data contract for outbound group-chat messages and the messenger seams.
//!
//! The core only defines the payload shape and the one-way send contracts.
//! Transports (HTTP bridge, no-op, test doubles) live in `concierge-chat`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single selectable option rendered as a clickable button.
///
/// `selector` is the opaque vote token; a member tapping the button produces
/// an inbound group message whose text equals the selector verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadButton {
    pub name: String,
    pub selector: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "isHidden")]
    pub is_hidden: String,
}

impl PayloadButton {
    pub fn vote(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
            kind: "default".to_owned(),
            is_hidden: "1".to_owned(),
        }
    }
}

/// Outbound group payload: prompt text plus its button list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPayload {
    pub text: String,
    pub button: Vec<PayloadButton>,
}

impl GroupPayload {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self { text: text.into(), button: Vec::new() }
    }
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("remote rejected message: {0}")]
    Rejected(String),
}

/// One-way delivery to a group chat. Fire-and-forget at every call site:
/// a failed send is logged and never surfaced to the caller.
#[async_trait]
pub trait GroupMessenger: Send + Sync {
    async fn send_to_group(&self, group_id: &str, payload: &GroupPayload) -> Result<(), SendError>;
}

/// One-way delivery of plain text to a single user.
#[async_trait]
pub trait UserMessenger: Send + Sync {
    async fn send_to_user(&self, user_id: &str, text: &str) -> Result<(), SendError>;
}
