use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use concierge_chat::{EventContext, EventDispatcher, HandlerResult, InboundEvent};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Shared webhook state: the event dispatcher plus the token inbound
/// callbacks must present.
#[derive(Clone)]
pub struct WebhookState {
    pub events: Arc<EventDispatcher>,
    pub callback_token: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    pub token: String,
    #[serde(flatten)]
    pub event: InboundEvent,
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

pub fn router(state: WebhookState) -> Router {
    Router::new().route("/callback", post(callback)).with_state(state)
}

pub async fn callback(
    State(state): State<WebhookState>,
    Json(request): Json<CallbackRequest>,
) -> (StatusCode, Json<CallbackResponse>) {
    if request.token != state.callback_token {
        return (
            StatusCode::UNAUTHORIZED,
            Json(CallbackResponse { status: "unauthorized", response: None }),
        );
    }

    let ctx = EventContext { correlation_id: Uuid::new_v4().to_string() };
    match state.events.dispatch(&request.event, &ctx).await {
        Ok(HandlerResult::Responded(response)) => {
            (StatusCode::OK, Json(CallbackResponse { status: "ok", response: Some(response) }))
        }
        Ok(HandlerResult::Processed) => {
            (StatusCode::OK, Json(CallbackResponse { status: "ok", response: None }))
        }
        Ok(HandlerResult::Ignored) => {
            (StatusCode::OK, Json(CallbackResponse { status: "ignored", response: None }))
        }
        Err(error) => {
            warn!(
                event_name = "server.webhook.dispatch_failed",
                correlation_id = %ctx.correlation_id,
                error = %error,
                "event dispatch failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CallbackResponse { status: "error", response: None }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use concierge_chat::events::GroupMessageHandler;
    use concierge_chat::EventDispatcher;
    use concierge_core::vote::MessageLog;
    use serde_json::json;

    use super::{callback, CallbackRequest, WebhookState};

    fn state_with_log() -> (Arc<MessageLog>, WebhookState) {
        let log = Arc::new(MessageLog::new());
        let mut events = EventDispatcher::new();
        events.register(GroupMessageHandler::new(Arc::clone(&log)));
        (log, WebhookState { events: Arc::new(events), callback_token: "cb-token".to_owned() })
    }

    fn request(value: serde_json::Value) -> CallbackRequest {
        serde_json::from_value(value).expect("request fixture should deserialize")
    }

    #[tokio::test]
    async fn valid_group_callback_lands_in_the_log() {
        let (log, state) = state_with_log();
        let request = request(json!({
            "token": "cb-token",
            "kind": "group_message",
            "group_id": "G1",
            "sender": "amy",
            "text": "vote:abc",
        }));

        let (status, Json(payload)) = callback(State(state), Json(request)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ok");
        assert_eq!(log.for_group("G1").len(), 1);
    }

    #[tokio::test]
    async fn wrong_token_is_rejected() {
        let (log, state) = state_with_log();
        let request = request(json!({
            "token": "wrong",
            "kind": "group_message",
            "group_id": "G1",
            "sender": "amy",
            "text": "vote:abc",
        }));

        let (status, Json(payload)) = callback(State(state), Json(request)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(payload.status, "unauthorized");
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn unrouted_events_report_ignored() {
        let (_, state) = state_with_log();
        let request = request(json!({
            "token": "cb-token",
            "kind": "direct_message",
            "user_id": "U1",
            "text": "hello",
        }));

        let (status, Json(payload)) = callback(State(state), Json(request)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ignored");
    }
}
