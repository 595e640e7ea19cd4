use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use concierge_core::vote::{GroupMessage, MessageLog};

/// Inbound callback events from the chat platform.
///
/// A vote click arrives as a plain `GroupMessage` whose text is the tapped
/// button's selector; the platform does not distinguish clicks from typed
/// messages, and neither do we until tally time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundEvent {
    DirectMessage(DirectMessageEvent),
    GroupMessage(GroupMessageEvent),
    Unsupported { event_type: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessageEvent {
    pub user_id: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMessageEvent {
    pub group_id: String,
    pub sender: String,
    pub text: String,
}

impl InboundEvent {
    pub fn event_type(&self) -> InboundEventType {
        match self {
            Self::DirectMessage(_) => InboundEventType::DirectMessage,
            Self::GroupMessage(_) => InboundEventType::GroupMessage,
            Self::Unsupported { .. } => InboundEventType::Unsupported,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum InboundEventType {
    DirectMessage,
    GroupMessage,
    Unsupported,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventContext {
    pub correlation_id: String,
}

impl Default for EventContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Responded(String),
    Processed,
    Ignored,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventHandlerError {
    #[error("direct message handler failure: {0}")]
    DirectMessage(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error(transparent)]
    Handler(#[from] EventHandlerError),
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    fn event_type(&self) -> InboundEventType;
    async fn handle(
        &self,
        event: &InboundEvent,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError>;
}

/// Routes each inbound event to the handler registered for its type.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<InboundEventType, Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.handlers.insert(handler.event_type(), Arc::new(handler));
    }

    pub async fn dispatch(
        &self,
        event: &InboundEvent,
        ctx: &EventContext,
    ) -> Result<HandlerResult, DispatchError> {
        let Some(handler) = self.handlers.get(&event.event_type()) else {
            return Ok(HandlerResult::Ignored);
        };

        handler.handle(event, ctx).await.map_err(DispatchError::from)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

/// The conversational surface behind direct messages; implemented by the
/// agent's turn dispatcher at wiring time.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn handle_user_message(&self, user_id: &str, text: &str) -> String;
}

pub struct DirectMessageHandler<S> {
    sink: S,
}

impl<S> DirectMessageHandler<S>
where
    S: MessageSink,
{
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl<S> EventHandler for DirectMessageHandler<S>
where
    S: MessageSink + 'static,
{
    fn event_type(&self) -> InboundEventType {
        InboundEventType::DirectMessage
    }

    async fn handle(
        &self,
        event: &InboundEvent,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let InboundEvent::DirectMessage(event) = event else {
            return Ok(HandlerResult::Ignored);
        };

        debug!(
            event_name = "chat.event.direct_message",
            correlation_id = %ctx.correlation_id,
            user_id = %event.user_id,
            "routing direct message to agent turn"
        );
        let response = self.sink.handle_user_message(&event.user_id, &event.text).await;
        Ok(HandlerResult::Responded(response))
    }
}

/// Appends every group message to the log. Vote clicks are not special-cased
/// here; the tally engine decides later which texts resolve to selectors.
pub struct GroupMessageHandler {
    log: Arc<MessageLog>,
}

impl GroupMessageHandler {
    pub fn new(log: Arc<MessageLog>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl EventHandler for GroupMessageHandler {
    fn event_type(&self) -> InboundEventType {
        InboundEventType::GroupMessage
    }

    async fn handle(
        &self,
        event: &InboundEvent,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let InboundEvent::GroupMessage(event) = event else {
            return Ok(HandlerResult::Ignored);
        };

        debug!(
            event_name = "chat.event.group_message",
            correlation_id = %ctx.correlation_id,
            group_id = %event.group_id,
            "appending group message to log"
        );
        self.log.append(GroupMessage::new(
            event.group_id.clone(),
            event.sender.clone(),
            event.text.clone(),
        ));
        Ok(HandlerResult::Processed)
    }
}
