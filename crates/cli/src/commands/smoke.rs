use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use concierge_agent::{ConversationHistory, EchoAgentClient, TurnDispatcher};
use concierge_chat::NoopMessenger;
use concierge_core::outbound::{GroupMessenger, GroupPayload, SendError};
use concierge_core::tools::{ToolArgs, Toolbox};
use concierge_core::vote::{GroupMessage, MessageLog, SelectorRegistry};
use serde::Serialize;
use serde_json::json;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: &'static str,
    duration_ms: u128,
    details: String,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    overall_status: &'static str,
    checks: Vec<SmokeCheck>,
}

#[derive(Default)]
struct CapturingGroups {
    payloads: Mutex<Vec<GroupPayload>>,
}

#[async_trait]
impl GroupMessenger for CapturingGroups {
    async fn send_to_group(&self, _: &str, payload: &GroupPayload) -> Result<(), SendError> {
        self.payloads.lock().expect("capture lock").push(payload.clone());
        Ok(())
    }
}

pub fn run() -> CommandResult {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "smoke",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                1,
            )
        }
    };

    let checks = runtime.block_on(async {
        vec![
            timed("selector_round_trip", selector_round_trip()).await,
            timed("vote_flow", vote_flow()).await,
            timed("dispatcher_passthrough", dispatcher_passthrough()).await,
        ]
    });

    let all_pass = checks.iter().all(|check| check.status == "pass");
    let report =
        SmokeReport { overall_status: if all_pass { "pass" } else { "fail" }, checks };

    let output = serde_json::to_string_pretty(&report)
        .unwrap_or_else(|error| format!("{{\"overall_status\":\"fail\",\"error\":\"{error}\"}}"));
    CommandResult { exit_code: if all_pass { 0 } else { 1 }, output }
}

async fn timed(
    name: &'static str,
    check: impl std::future::Future<Output = Result<String, String>>,
) -> SmokeCheck {
    let started = Instant::now();
    let outcome = check.await;
    let duration_ms = started.elapsed().as_millis();

    match outcome {
        Ok(details) => SmokeCheck { name, status: "pass", duration_ms, details },
        Err(details) => SmokeCheck { name, status: "fail", duration_ms, details },
    }
}

async fn selector_round_trip() -> Result<String, String> {
    let registry = SelectorRegistry::new();
    let selector = registry.register("Location: London");

    match registry.resolve(&selector).as_deref() {
        Some("Location: London") => Ok(format!("selector {selector} resolved")),
        other => Err(format!("unexpected resolution: {other:?}")),
    }
}

async fn vote_flow() -> Result<String, String> {
    let registry = Arc::new(SelectorRegistry::new());
    let log = Arc::new(MessageLog::new());
    let groups = Arc::new(CapturingGroups::default());
    let toolbox = Arc::new(Toolbox::new(
        Arc::clone(&registry),
        Arc::clone(&log),
        Arc::clone(&groups) as Arc<dyn GroupMessenger>,
    ));

    let args = |value: serde_json::Value| -> ToolArgs {
        match value {
            serde_json::Value::Object(map) => ToolArgs::new(map),
            _ => ToolArgs::default(),
        }
    };

    let created = toolbox
        .invoke(
            "book_restaurant_vote",
            &args(json!({"group_id": "SMOKE", "date": "2024-07-20", "guests": 4})),
        )
        .await
        .map_err(|error| format!("vote creation failed: {error}"))?;
    if !created.contains("Created 3 restaurant booking votes") {
        return Err(format!("unexpected vote creation response: {created}"));
    }

    let payloads = groups.payloads.lock().expect("capture lock").clone();
    let selector = payloads
        .iter()
        .flat_map(|payload| &payload.button)
        .find(|button| button.name == "Location: London")
        .map(|button| button.selector.clone())
        .ok_or_else(|| "London option was not posted".to_string())?;

    for member in ["amy", "ben", "caro"] {
        log.append(GroupMessage::new("SMOKE", member, &selector));
    }

    let results = toolbox
        .invoke("get_restaurant_vote_results", &args(json!({"group_id": "SMOKE"})))
        .await
        .map_err(|error| format!("tally failed: {error}"))?;
    if !results.contains("• Location: London: 3 votes") {
        return Err(format!("unexpected tally response: {results}"));
    }

    let booked = toolbox
        .invoke(
            "execute_restaurant_booking_with_votes",
            &args(json!({
                "group_id": "SMOKE",
                "location": "London",
                "date": "2024-07-20",
                "time": "19:00 (7 PM)",
                "guests": "4 people",
                "cuisine": "French",
            })),
        )
        .await
        .map_err(|error| format!("vote-backed booking failed: {error}"))?;
    if !booked.contains("confirmed based on group votes") {
        return Err(format!("unexpected booking response: {booked}"));
    }

    Ok("vote created, tallied, and booked".to_string())
}

async fn dispatcher_passthrough() -> Result<String, String> {
    let toolbox = Arc::new(Toolbox::new(
        Arc::new(SelectorRegistry::new()),
        Arc::new(MessageLog::new()),
        Arc::new(CapturingGroups::default()),
    ));
    let dispatcher = TurnDispatcher::new(
        Arc::new(ConversationHistory::default()),
        Arc::new(EchoAgentClient),
        toolbox,
        Arc::new(NoopMessenger),
    );

    let response = dispatcher.handle_user_message("smoke-user", "hello concierge").await;
    if response == "received: hello concierge" {
        Ok("dispatcher echoed the passthrough response".to_string())
    } else {
        Err(format!("unexpected dispatcher response: {response}"))
    }
}
