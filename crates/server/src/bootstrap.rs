use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use concierge_agent::{ConversationHistory, EchoAgentClient, TurnDispatcher};
use concierge_chat::events::{DirectMessageHandler, GroupMessageHandler};
use concierge_chat::{EventDispatcher, HttpMessenger, MessageSink};
use concierge_core::config::{AppConfig, ConfigError, LoadOptions};
use concierge_core::outbound::{GroupMessenger, UserMessenger};
use concierge_core::tools::Toolbox;
use concierge_core::vote::{MessageLog, SelectorRegistry};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::info;

/// Everything the server runs on: configuration, the three shared stores,
/// and the event dispatcher that feeds them.
pub struct Application {
    pub config: AppConfig,
    pub registry: Arc<SelectorRegistry>,
    pub log: Arc<MessageLog>,
    pub history: Arc<ConversationHistory>,
    pub events: Arc<EventDispatcher>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Adapts the agent's turn dispatcher to the chat crate's sink seam.
struct AgentSink {
    dispatcher: Arc<TurnDispatcher>,
}

#[async_trait]
impl MessageSink for AgentSink {
    async fn handle_user_message(&self, user_id: &str, text: &str) -> String {
        self.dispatcher.handle_user_message(user_id, text).await
    }
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let registry = Arc::new(SelectorRegistry::new());
    let log = Arc::new(MessageLog::new());
    let history = Arc::new(ConversationHistory::default());

    let messenger = Arc::new(HttpMessenger::new(
        config.chat.api_base_url.clone(),
        config.chat.api_token.expose_secret().to_owned(),
        Duration::from_secs(config.chat.timeout_secs),
    ));
    let group_messenger: Arc<dyn GroupMessenger> = messenger.clone();
    let user_messenger: Arc<dyn UserMessenger> = messenger;

    let toolbox =
        Arc::new(Toolbox::new(Arc::clone(&registry), Arc::clone(&log), group_messenger));

    // The LLM runtime is an external collaborator; the echo client stands in
    // until one is wired, which keeps the whole dispatch path exercisable.
    let dispatcher = Arc::new(TurnDispatcher::new(
        Arc::clone(&history),
        Arc::new(EchoAgentClient),
        toolbox,
        user_messenger,
    ));

    let mut events = EventDispatcher::new();
    events.register(GroupMessageHandler::new(Arc::clone(&log)));
    events.register(DirectMessageHandler::new(AgentSink { dispatcher }));

    info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        chat_bridge = %config.chat.api_base_url,
        handlers = events.handler_count(),
        "application bootstrap complete"
    );

    Ok(Application { config, registry, log, history, events: Arc::new(events) })
}
