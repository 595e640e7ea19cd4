use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use concierge_agent::ConversationHistory;
use concierge_core::vote::{MessageLog, SelectorRegistry};
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    pub registry: Arc<SelectorRegistry>,
    pub log: Arc<MessageLog>,
    pub history: Arc<ConversationHistory>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub registered_selectors: usize,
    pub logged_messages: usize,
    pub conversation_turns: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub detail: String,
    pub stores: StoreStats,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let payload = HealthResponse {
        status: "ready",
        detail: "concierge-server runtime initialized".to_string(),
        stores: StoreStats {
            registered_selectors: state.registry.len(),
            logged_messages: state.log.len(),
            conversation_turns: state.history.len(),
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use concierge_agent::ConversationHistory;
    use concierge_core::vote::{GroupMessage, MessageLog, SelectorRegistry};

    use super::{health, HealthState};

    #[tokio::test]
    async fn health_reports_store_statistics() {
        let registry = Arc::new(SelectorRegistry::new());
        registry.register("Location: London");
        let log = Arc::new(MessageLog::new());
        log.append(GroupMessage::new("G1", "amy", "hello"));

        let state = HealthState {
            registry,
            log,
            history: Arc::new(ConversationHistory::default()),
        };

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.stores.registered_selectors, 1);
        assert_eq!(payload.stores.logged_messages, 1);
        assert_eq!(payload.stores.conversation_turns, 1);
    }
}
