//! End-to-end group vote flow: create category votes, collect clicks,
//! tally, and complete the booking with the winners.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use concierge_agent::{
    AgentClient, AgentError, AgentMessage, ConversationHistory, ToolCallRequest, Turn,
    TurnDispatcher,
};
use concierge_core::outbound::{GroupMessenger, GroupPayload, SendError, UserMessenger};
use concierge_core::tools::Toolbox;
use concierge_core::vote::{GroupMessage, MessageLog, SelectorRegistry};
use serde_json::{json, Value};

/// Replays one scripted response per turn, in order.
struct TurnScript {
    turns: Mutex<Vec<Vec<AgentMessage>>>,
}

impl TurnScript {
    fn new(turns: Vec<Vec<AgentMessage>>) -> Self {
        Self { turns: Mutex::new(turns) }
    }
}

#[async_trait]
impl AgentClient for TurnScript {
    async fn invoke(&self, _: &[Turn]) -> Result<Vec<AgentMessage>, AgentError> {
        let mut turns = self.turns.lock().expect("script lock");
        if turns.is_empty() {
            return Ok(vec![AgentMessage::text_only("script exhausted")]);
        }
        Ok(turns.remove(0))
    }
}

#[derive(Default)]
struct CapturingGroups {
    payloads: Mutex<Vec<(String, GroupPayload)>>,
}

#[async_trait]
impl GroupMessenger for CapturingGroups {
    async fn send_to_group(&self, group_id: &str, payload: &GroupPayload) -> Result<(), SendError> {
        self.payloads.lock().expect("capture lock").push((group_id.to_owned(), payload.clone()));
        Ok(())
    }
}

#[derive(Default)]
struct NullUsers;

#[async_trait]
impl UserMessenger for NullUsers {
    async fn send_to_user(&self, _: &str, _: &str) -> Result<(), SendError> {
        Ok(())
    }
}

fn tool_call(name: &str, args: Value) -> AgentMessage {
    let Value::Object(map) = args else { panic!("fixture must be an object") };
    AgentMessage::with_tool_call(ToolCallRequest::new(name, map))
}

#[tokio::test]
async fn group_vote_drives_a_complete_restaurant_booking() {
    let registry = Arc::new(SelectorRegistry::new());
    let log = Arc::new(MessageLog::new());
    let groups = Arc::new(CapturingGroups::default());
    let toolbox = Arc::new(Toolbox::new(
        Arc::clone(&registry),
        Arc::clone(&log),
        Arc::clone(&groups) as Arc<dyn GroupMessenger>,
    ));

    let script = TurnScript::new(vec![
        // Turn 1: the user asked for a group booking knowing only the date.
        vec![tool_call(
            "book_restaurant_vote",
            json!({"group_id": "G1", "date": "2024-07-20", "guests": 4}),
        )],
        // Turn 2: results are requested after the group voted.
        vec![tool_call("get_restaurant_vote_results", json!({"group_id": "G1"}))],
        // Turn 3: the booking is executed with the winning options.
        vec![tool_call(
            "execute_restaurant_booking_with_votes",
            json!({
                "group_id": "G1",
                "location": "London",
                "date": "2024-07-20",
                "time": "19:00 (7 PM)",
                "guests": "4 people",
                "cuisine": "French",
            }),
        )],
    ]);

    let dispatcher = TurnDispatcher::new(
        Arc::new(ConversationHistory::default()),
        Arc::new(script),
        toolbox,
        Arc::new(NullUsers),
    );

    // Turn 1 posts one vote per missing category: location, time, cuisine.
    let created = dispatcher.handle_user_message("U1", "plan dinner with my group G1").await;
    assert!(created.contains("Created 3 restaurant booking votes in group G1"));
    assert!(created.contains("location, time, cuisine"));

    let payloads = groups.payloads.lock().expect("capture lock").clone();
    assert_eq!(payloads.len(), 3);
    assert!(payloads.iter().all(|(group_id, _)| group_id == "G1"));

    // Five members tap "Location: London", two tap "Location: Beijing";
    // the time and cuisine votes each get a clear winner too.
    let selector_for = |option: &str| -> String {
        payloads
            .iter()
            .flat_map(|(_, payload)| &payload.button)
            .find(|button| button.name == option)
            .map(|button| button.selector.clone())
            .expect("option should have been posted")
    };
    let click = |selector: &str, member: &str| {
        log.append(GroupMessage::new("G1", member, selector));
    };

    let london = selector_for("Location: London");
    for member in ["amy", "ben", "caro", "dev", "ela"] {
        click(&london, member);
    }
    let beijing = selector_for("Location: Beijing");
    for member in ["fred", "gia"] {
        click(&beijing, member);
    }
    let seven_pm = selector_for("Time: 19:00 (7 PM)");
    for member in ["amy", "ben", "caro"] {
        click(&seven_pm, member);
    }
    let french = selector_for("Cuisine: French");
    for member in ["amy", "dev"] {
        click(&french, member);
    }

    // Turn 2 tallies the clicks.
    let results = dispatcher.handle_user_message("U1", "how did the vote go?").await;
    assert!(results.contains("• Location: London: 5 votes"));
    assert!(results.contains("• Location: Beijing: 2 votes"));
    assert!(results.contains("• Location: London\n"));
    assert!(results.contains("• Time: 19:00 (7 PM)\n"));
    assert!(results.contains("• Cuisine: French\n"));

    // Turn 3 books with the winners.
    let booked = dispatcher.handle_user_message("U1", "book it with the winners").await;
    assert!(booked.contains("✅ Restaurant booking confirmed based on group votes!"));
    assert!(booked.contains("📍 Location: London"));
    assert!(booked.contains("👥 Guests: 4"));
    assert!(booked.contains("🍴 Cuisine: french"));
}
