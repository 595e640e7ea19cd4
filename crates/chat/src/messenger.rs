use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use concierge_core::outbound::{GroupMessenger, GroupPayload, SendError, UserMessenger};

/// HTTP client for the group-chat bridge API.
///
/// The bridge exposes two endpoints: `POST /messages/user` for direct text
/// and `POST /messages/group` for button payloads. Both are best-effort;
/// callers treat failures as fire-and-forget.
pub struct HttpMessenger {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

#[derive(Serialize)]
struct UserMessageBody<'a> {
    to_user: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct GroupMessageBody<'a> {
    group_id: &'a str,
    #[serde(flatten)]
    payload: &'a GroupPayload,
}

impl HttpMessenger {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, base_url: base_url.into(), api_token: api_token.into() }
    }

    async fn post<B>(&self, path: &str, body: &B) -> Result<(), SendError>
    where
        B: Serialize + Sync,
    {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await
            .map_err(|error| SendError::Transport(error.to_string()))?;

        if !response.status().is_success() {
            return Err(SendError::Rejected(format!(
                "{} responded {}",
                url,
                response.status()
            )));
        }

        debug!(event_name = "chat.send.delivered", url = %url, "message delivered");
        Ok(())
    }
}

#[async_trait]
impl UserMessenger for HttpMessenger {
    async fn send_to_user(&self, user_id: &str, text: &str) -> Result<(), SendError> {
        self.post("/messages/user", &UserMessageBody { to_user: user_id, text }).await
    }
}

#[async_trait]
impl GroupMessenger for HttpMessenger {
    async fn send_to_group(&self, group_id: &str, payload: &GroupPayload) -> Result<(), SendError> {
        self.post("/messages/group", &GroupMessageBody { group_id, payload }).await
    }
}

/// Stand-in transport for local runs and tests: logs and discards.
#[derive(Debug, Default)]
pub struct NoopMessenger;

#[async_trait]
impl UserMessenger for NoopMessenger {
    async fn send_to_user(&self, user_id: &str, text: &str) -> Result<(), SendError> {
        debug!(
            event_name = "chat.send.noop",
            user_id = %user_id,
            chars = text.len(),
            "user message discarded by noop transport"
        );
        Ok(())
    }
}

#[async_trait]
impl GroupMessenger for NoopMessenger {
    async fn send_to_group(&self, group_id: &str, payload: &GroupPayload) -> Result<(), SendError> {
        debug!(
            event_name = "chat.send.noop",
            group_id = %group_id,
            buttons = payload.button.len(),
            "group payload discarded by noop transport"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use concierge_core::outbound::{GroupPayload, PayloadButton, UserMessenger};

    use super::NoopMessenger;

    #[tokio::test]
    async fn noop_messenger_always_succeeds() {
        let messenger = NoopMessenger;
        assert!(messenger.send_to_user("U1", "hello").await.is_ok());
    }

    #[test]
    fn group_body_flattens_payload_fields() {
        let payload = GroupPayload {
            text: "vote now".to_owned(),
            button: vec![PayloadButton::vote("Location: London", "vote:abc")],
        };
        let body = super::GroupMessageBody { group_id: "G1", payload: &payload };

        let json = serde_json::to_value(&body).expect("body serializes");
        assert_eq!(json["group_id"], "G1");
        assert_eq!(json["text"], "vote now");
        assert_eq!(json["button"][0]["isHidden"], "1");
    }
}
