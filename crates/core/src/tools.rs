//! Tool contracts and the dispatch registry.
//!
//! Every bookable tool declares its required parameters in a static table
//! and registers a handler that executes the typed calculator and renders
//! the user-visible confirmation. The dispatcher looks a tool up once by
//! name instead of branching per tool.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::booking::{cab, flight, hotel, restaurant};
use crate::booking::{CabRequest, FlightRequest, HotelRequest, RestaurantRequest};
use crate::errors::ToolError;
use crate::outbound::GroupMessenger;
use crate::vote::{
    MessageLog, RestaurantPreferences, SelectorRegistry, TallyEngine, VoteSessionBuilder,
    VoteSessionOutcome, VoteTally,
};

/// Required-parameter contract for one tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub required: &'static [&'static str],
}

/// The static required-parameter table.
pub static TOOL_SPECS: [ToolSpec; 8] = [
    ToolSpec {
        name: "book_hotel",
        required: &["location", "check_in", "check_out", "guests", "room_type"],
    },
    ToolSpec {
        name: "book_restaurant",
        required: &["location", "date", "time", "guests", "cuisine"],
    },
    ToolSpec { name: "book_restaurant_vote", required: &["group_id"] },
    ToolSpec { name: "get_restaurant_vote_results", required: &["group_id"] },
    ToolSpec {
        name: "execute_restaurant_booking_with_votes",
        required: &["group_id", "location", "date", "time", "guests", "cuisine"],
    },
    ToolSpec { name: "book_cab", required: &["pickup_location", "destination"] },
    ToolSpec { name: "book_flight", required: &["origin", "destination", "departure_date"] },
    ToolSpec { name: "initiate_vote", required: &["group_id", "title", "options"] },
];

/// Tools whose raw agent output passes through without parameter gating.
pub const EXCLUDED_TOOLS: [&str; 2] = ["count_vote_result", "generate_image"];

pub fn spec_for(name: &str) -> Option<&'static ToolSpec> {
    TOOL_SPECS.iter().find(|spec| spec.name == name)
}

pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_TOOLS.contains(&name)
}

/// Arguments accumulated across one agent turn's tool calls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolArgs {
    values: Map<String, Value>,
}

impl ToolArgs {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Last-writer-wins merge of another call's arguments.
    pub fn merge(&mut self, values: &Map<String, Value>) {
        for (key, value) in values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// A parameter counts as supplied when it is present and neither empty
    /// nor the literal sentinel `"undefined"`.
    pub fn is_supplied(&self, key: &str) -> bool {
        match self.values.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(text)) => {
                let trimmed = text.trim();
                !trimmed.is_empty() && trimmed != "undefined"
            }
            Some(Value::Number(number)) => number.as_f64().is_some_and(|value| value != 0.0),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(_) => true,
        }
    }

    pub fn str_arg(&self, key: &str) -> Option<String> {
        if !self.is_supplied(key) {
            return None;
        }
        match self.values.get(key) {
            Some(Value::String(text)) => Some(text.trim().to_owned()),
            Some(Value::Number(number)) => Some(number.to_string()),
            _ => None,
        }
    }

    /// Numeric argument, accepting plain numbers, numeric strings, and vote
    /// display forms such as `"4 people"` or `"8+ people"`.
    pub fn u32_arg(&self, key: &str) -> Option<u32> {
        if !self.is_supplied(key) {
            return None;
        }
        match self.values.get(key) {
            Some(Value::Number(number)) => number.as_u64().map(|value| value as u32),
            Some(Value::String(text)) => {
                let digits: String =
                    text.trim().chars().take_while(|ch| ch.is_ascii_digit()).collect();
                digits.parse().ok()
            }
            _ => None,
        }
    }

    pub fn str_list(&self, key: &str) -> Option<Vec<String>> {
        match self.values.get(key) {
            Some(Value::Array(items)) if !items.is_empty() => Some(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn missing_for(&self, spec: &ToolSpec) -> Vec<&'static str> {
        spec.required.iter().copied().filter(|field| !self.is_supplied(field)).collect()
    }
}

/// Shared collaborators handed to every tool handler.
pub struct ToolContext {
    pub sessions: VoteSessionBuilder,
    pub tally: TallyEngine,
}

#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &'static str;
    async fn invoke(&self, ctx: &ToolContext, args: &ToolArgs) -> Result<String, ToolError>;
}

/// Name-keyed registry of every bookable tool.
pub struct Toolbox {
    context: ToolContext,
    handlers: HashMap<&'static str, Box<dyn ToolHandler>>,
}

impl Toolbox {
    pub fn new(
        registry: Arc<SelectorRegistry>,
        log: Arc<MessageLog>,
        groups: Arc<dyn GroupMessenger>,
    ) -> Self {
        let context = ToolContext {
            sessions: VoteSessionBuilder::new(Arc::clone(&registry), groups),
            tally: TallyEngine::new(registry, log),
        };

        let mut toolbox = Self { context, handlers: HashMap::new() };
        toolbox.register(HotelTool);
        toolbox.register(RestaurantTool);
        toolbox.register(CabTool);
        toolbox.register(FlightTool);
        toolbox.register(RestaurantVoteTool);
        toolbox.register(VoteResultsTool);
        toolbox.register(ExecuteWithVotesTool);
        toolbox.register(InitiateVoteTool);
        toolbox
    }

    fn register<H>(&mut self, handler: H)
    where
        H: ToolHandler + 'static,
    {
        self.handlers.insert(handler.name(), Box::new(handler));
    }

    pub fn knows(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Executes a fully-parameterized tool and returns the confirmation
    /// text. Callers are expected to have gated on [`ToolArgs::missing_for`]
    /// first; handlers still re-validate their own inputs.
    pub async fn invoke(&self, name: &str, args: &ToolArgs) -> Result<String, ToolError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| ToolError::execution(format!("unknown tool `{name}`")))?;
        handler.invoke(&self.context, args).await
    }
}

struct HotelTool;

#[async_trait]
impl ToolHandler for HotelTool {
    fn name(&self) -> &'static str {
        "book_hotel"
    }

    async fn invoke(&self, _ctx: &ToolContext, args: &ToolArgs) -> Result<String, ToolError> {
        let request = HotelRequest {
            location: args.str_arg("location").unwrap_or_default(),
            check_in: args.str_arg("check_in").unwrap_or_default(),
            check_out: args.str_arg("check_out").unwrap_or_default(),
            guests: args.u32_arg("guests"),
            room_type: args.str_arg("room_type"),
        };
        let booking = hotel::book_hotel(&request)?;
        Ok(hotel::format_confirmation(&booking))
    }
}

struct RestaurantTool;

#[async_trait]
impl ToolHandler for RestaurantTool {
    fn name(&self) -> &'static str {
        "book_restaurant"
    }

    async fn invoke(&self, _ctx: &ToolContext, args: &ToolArgs) -> Result<String, ToolError> {
        let booking = restaurant::book_restaurant(&restaurant_request(args))?;
        Ok(restaurant::format_confirmation(&booking))
    }
}

struct CabTool;

#[async_trait]
impl ToolHandler for CabTool {
    fn name(&self) -> &'static str {
        "book_cab"
    }

    async fn invoke(&self, _ctx: &ToolContext, args: &ToolArgs) -> Result<String, ToolError> {
        let request = CabRequest {
            pickup_location: args.str_arg("pickup_location").unwrap_or_default(),
            destination: args.str_arg("destination").unwrap_or_default(),
            date: args.str_arg("date"),
            time: args.str_arg("time"),
            passengers: args.u32_arg("passengers"),
            cab_type: args.str_arg("cab_type"),
            payment_method: args.str_arg("payment_method"),
        };
        let booking = cab::book_cab(&request)?;
        Ok(cab::format_confirmation(&booking))
    }
}

struct FlightTool;

#[async_trait]
impl ToolHandler for FlightTool {
    fn name(&self) -> &'static str {
        "book_flight"
    }

    async fn invoke(&self, _ctx: &ToolContext, args: &ToolArgs) -> Result<String, ToolError> {
        let request = FlightRequest {
            origin: args.str_arg("origin").unwrap_or_default(),
            destination: args.str_arg("destination").unwrap_or_default(),
            departure_date: args.str_arg("departure_date").unwrap_or_default(),
            return_date: args.str_arg("return_date"),
            passengers: args.u32_arg("passengers"),
            cabin_class: args.str_arg("cabin_class"),
        };
        let booking = flight::book_flight(&request)?;
        Ok(flight::format_confirmation(&booking))
    }
}

struct RestaurantVoteTool;

#[async_trait]
impl ToolHandler for RestaurantVoteTool {
    fn name(&self) -> &'static str {
        "book_restaurant_vote"
    }

    async fn invoke(&self, ctx: &ToolContext, args: &ToolArgs) -> Result<String, ToolError> {
        let group_id = args.str_arg("group_id").unwrap_or_default();
        let preferences = RestaurantPreferences {
            location: args.str_arg("location"),
            date: args.str_arg("date"),
            time: args.str_arg("time"),
            guests: args.u32_arg("guests"),
            cuisine: args.str_arg("cuisine"),
        };

        match ctx.sessions.create_restaurant_votes(&group_id, &preferences).await? {
            VoteSessionOutcome::VotesCreated { group_id, created_votes } => Ok(format!(
                "✅ Created {} restaurant booking votes in group {}!\n\n📊 Votes created for: {}\n🗳️ Group members can now vote on each category separately.\n\nOnce all votes are complete, you can check the results and make the final booking.",
                created_votes.len(),
                group_id,
                created_votes.join(", "),
            )),
            VoteSessionOutcome::NoVotesNeeded { group_id } => Ok(format!(
                "✅ All restaurant booking parameters are already provided for group {group_id}!\n\nYou can proceed directly to booking with the provided parameters.",
            )),
        }
    }
}

struct VoteResultsTool;

#[async_trait]
impl ToolHandler for VoteResultsTool {
    fn name(&self) -> &'static str {
        "get_restaurant_vote_results"
    }

    async fn invoke(&self, ctx: &ToolContext, args: &ToolArgs) -> Result<String, ToolError> {
        let group_id = args.str_arg("group_id").unwrap_or_default();
        match ctx.tally.tally(&group_id)? {
            VoteTally::NoVotesFound => {
                Ok("📊 **Restaurant Vote Results**\n\nNo votes found".to_owned())
            }
            VoteTally::VoteResults { results, winning_options } => {
                let mut text = String::from("📊 **Restaurant Vote Results**\n\n");
                for entry in &results {
                    text.push_str(&format!("• {}: {} votes\n", entry.option, entry.votes));
                }
                text.push_str("\n🏆 **Winning Options:**\n");
                for winner in &winning_options {
                    text.push_str(&format!(
                        "• {}: {}\n",
                        title_case(&winner.category),
                        winner.value
                    ));
                }
                Ok(text)
            }
        }
    }
}

struct ExecuteWithVotesTool;

#[async_trait]
impl ToolHandler for ExecuteWithVotesTool {
    fn name(&self) -> &'static str {
        "execute_restaurant_booking_with_votes"
    }

    async fn invoke(&self, _ctx: &ToolContext, args: &ToolArgs) -> Result<String, ToolError> {
        let group_id = args.str_arg("group_id").unwrap_or_default();
        if group_id.is_empty() {
            return Err(ToolError::validation("Group ID is required"));
        }

        let booking = restaurant::book_restaurant(&restaurant_request(args))?;
        Ok(format!(
            "✅ Restaurant booking confirmed based on group votes!\n\n🍽️ Restaurant: {}\n📍 Location: {}\n📅 Date: {}\n🕐 Time: {}\n👥 Guests: {}\n🍴 Cuisine: {}\n💰 Estimated Total: ${}\n🆔 Reservation ID: {}\n\n🎉 Booking completed based on group votes!",
            booking.restaurant,
            booking.location,
            booking.date,
            booking.time,
            booking.guests,
            booking.cuisine,
            booking.total_estimated_price,
            booking.reservation_id,
        ))
    }
}

struct InitiateVoteTool;

#[async_trait]
impl ToolHandler for InitiateVoteTool {
    fn name(&self) -> &'static str {
        "initiate_vote"
    }

    async fn invoke(&self, ctx: &ToolContext, args: &ToolArgs) -> Result<String, ToolError> {
        let group_id = args.str_arg("group_id").unwrap_or_default();
        let title = args.str_arg("title").unwrap_or_default();
        let options = args.str_list("options").unwrap_or_default();

        ctx.sessions.create_custom_vote(&group_id, &title, &options).await?;
        Ok(format!(
            "✅ Vote initiated successfully!\n\n📊 Title: {title}\n👥 Group: {group_id}\n🗳️ Options: {}",
            options.join(", "),
        ))
    }
}

fn restaurant_request(args: &ToolArgs) -> RestaurantRequest {
    RestaurantRequest {
        location: args.str_arg("location").unwrap_or_default(),
        date: args.str_arg("date").unwrap_or_default(),
        time: args.str_arg("time").unwrap_or_default(),
        guests: args.u32_arg("guests"),
        cuisine: args.str_arg("cuisine"),
    }
}

fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{json, Map, Value};

    use super::{is_excluded, spec_for, ToolArgs, Toolbox};
    use crate::errors::ToolError;
    use crate::outbound::{GroupMessenger, GroupPayload, SendError};
    use crate::vote::{GroupMessage, MessageLog, SelectorRegistry};

    struct SilentMessenger;

    #[async_trait]
    impl GroupMessenger for SilentMessenger {
        async fn send_to_group(&self, _: &str, _: &GroupPayload) -> Result<(), SendError> {
            Ok(())
        }
    }

    fn args(pairs: Value) -> ToolArgs {
        let Value::Object(map) = pairs else { panic!("fixture must be an object") };
        ToolArgs::new(map)
    }

    fn toolbox() -> (Arc<SelectorRegistry>, Arc<MessageLog>, Toolbox) {
        let registry = Arc::new(SelectorRegistry::new());
        let log = Arc::new(MessageLog::new());
        let toolbox =
            Toolbox::new(Arc::clone(&registry), Arc::clone(&log), Arc::new(SilentMessenger));
        (registry, log, toolbox)
    }

    #[test]
    fn spec_table_covers_all_bookable_tools() {
        assert_eq!(
            spec_for("book_hotel").map(|spec| spec.required),
            Some(["location", "check_in", "check_out", "guests", "room_type"].as_slice())
        );
        assert_eq!(
            spec_for("execute_restaurant_booking_with_votes").map(|spec| spec.required.len()),
            Some(6)
        );
        assert!(spec_for("download_video").is_none());
    }

    #[test]
    fn excluded_tools_bypass_gating() {
        assert!(is_excluded("count_vote_result"));
        assert!(is_excluded("generate_image"));
        assert!(!is_excluded("book_hotel"));
    }

    #[test]
    fn undefined_and_empty_values_count_as_missing() {
        let args = args(json!({
            "location": "London",
            "check_in": "undefined",
            "check_out": "",
            "guests": 0,
        }));
        let spec = spec_for("book_hotel").expect("spec exists");

        assert_eq!(args.missing_for(spec), vec!["check_in", "check_out", "guests", "room_type"]);
    }

    #[test]
    fn merge_is_last_writer_wins() {
        let mut merged = args(json!({"location": "London", "guests": 2}));
        let mut later = Map::new();
        later.insert("guests".to_owned(), json!(6));
        merged.merge(&later);

        assert_eq!(merged.u32_arg("guests"), Some(6));
        assert_eq!(merged.str_arg("location").as_deref(), Some("London"));
    }

    #[test]
    fn u32_arg_parses_vote_display_forms() {
        let args = args(json!({"a": "4 people", "b": "8+ people", "c": "6", "d": 3}));
        assert_eq!(args.u32_arg("a"), Some(4));
        assert_eq!(args.u32_arg("b"), Some(8));
        assert_eq!(args.u32_arg("c"), Some(6));
        assert_eq!(args.u32_arg("d"), Some(3));
    }

    #[tokio::test]
    async fn vote_tool_reports_created_categories() {
        let (registry, _, toolbox) = toolbox();
        let response = toolbox
            .invoke(
                "book_restaurant_vote",
                &args(json!({"group_id": "G1", "date": "2024-01-01", "guests": 4})),
            )
            .await
            .expect("vote tool should succeed");

        assert!(response.contains("Created 3 restaurant booking votes in group G1"));
        assert!(response.contains("location, time, cuisine"));
        assert_eq!(registry.len(), 12);
    }

    #[tokio::test]
    async fn vote_results_tool_renders_winners() {
        let (registry, log, toolbox) = toolbox();
        let london = registry.register("Location: London");
        for index in 0..5 {
            log.append(GroupMessage::new("G1", format!("m{index}"), &london));
        }

        let response = toolbox
            .invoke("get_restaurant_vote_results", &args(json!({"group_id": "G1"})))
            .await
            .expect("results tool should succeed");

        assert!(response.contains("• Location: London: 5 votes"));
        assert!(response.contains("🏆 **Winning Options:**"));
        assert!(response.contains("• Location: London\n"));
    }

    #[tokio::test]
    async fn execute_with_votes_accepts_vote_winner_values() {
        let (_, _, toolbox) = toolbox();
        let response = toolbox
            .invoke(
                "execute_restaurant_booking_with_votes",
                &args(json!({
                    "group_id": "G1",
                    "location": "London",
                    "date": "Tomorrow",
                    "time": "19:00 (7 PM)",
                    "guests": "4 people",
                    "cuisine": "French",
                })),
            )
            .await
            .expect("vote-backed booking should succeed");

        assert!(response.contains("confirmed based on group votes"));
        assert!(response.contains("👥 Guests: 4"));
    }

    #[tokio::test]
    async fn unknown_tool_is_an_execution_error() {
        let (_, _, toolbox) = toolbox();
        let result = toolbox.invoke("download_video", &ToolArgs::default()).await;
        assert!(matches!(result, Err(ToolError::Execution(_))));
    }
}
