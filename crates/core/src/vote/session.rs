use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::ToolError;
use crate::outbound::{GroupMessenger, GroupPayload, PayloadButton};
use crate::vote::registry::SelectorRegistry;

/// The restaurant-domain vote categories, in canonical posting order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteCategory {
    Location,
    Date,
    Time,
    Guests,
    Cuisine,
}

impl VoteCategory {
    pub const ALL: [VoteCategory; 5] =
        [Self::Location, Self::Date, Self::Time, Self::Guests, Self::Cuisine];

    /// The display prefix options are stored under, e.g. `Location` in
    /// `"Location: London"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Location => "Location",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Guests => "Guests",
            Self::Cuisine => "Cuisine",
        }
    }

    /// The lowercase key used in tally results and created-vote lists.
    pub fn key(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Date => "date",
            Self::Time => "time",
            Self::Guests => "guests",
            Self::Cuisine => "cuisine",
        }
    }

    /// The four canonical choices posted for this category.
    pub fn choices(self) -> [&'static str; 4] {
        match self {
            Self::Location => ["London", "Beijing", "New York", "Other"],
            Self::Date => ["Today", "Tomorrow", "This Weekend", "Next Week"],
            Self::Time => ["18:00 (6 PM)", "19:00 (7 PM)", "20:00 (8 PM)", "21:00 (9 PM)"],
            Self::Guests => ["2 people", "4 people", "6 people", "8+ people"],
            Self::Cuisine => ["International", "Chinese", "French", "Indian"],
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            Self::Location => "Where should we book?",
            Self::Date => "Which day works best?",
            Self::Time => "What time should we meet?",
            Self::Guests => "How many people are coming?",
            Self::Cuisine => "What kind of food are we in the mood for?",
        }
    }

    /// Full stored option text, `"<Category>: <choice>"`.
    pub fn option_text(self, choice: &str) -> String {
        format!("{}: {}", self.label(), choice)
    }
}

/// Booking preferences already supplied by the user. A `None` or blank value
/// means the group still has to vote on that category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestaurantPreferences {
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub guests: Option<u32>,
    pub cuisine: Option<String>,
}

impl RestaurantPreferences {
    fn is_decided(&self, category: VoteCategory) -> bool {
        fn present(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|text| !text.trim().is_empty())
        }

        match category {
            VoteCategory::Location => present(&self.location),
            VoteCategory::Date => present(&self.date),
            VoteCategory::Time => present(&self.time),
            VoteCategory::Guests => self.guests.is_some_and(|count| count > 0),
            VoteCategory::Cuisine => present(&self.cuisine),
        }
    }

    pub fn missing_categories(&self) -> Vec<VoteCategory> {
        VoteCategory::ALL.iter().copied().filter(|category| !self.is_decided(*category)).collect()
    }
}

/// Result of a vote-session creation attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VoteSessionOutcome {
    /// Every category was already supplied; nothing was posted.
    NoVotesNeeded { group_id: String },
    /// One vote payload was posted per listed category, in canonical order.
    VotesCreated { group_id: String, created_votes: Vec<String> },
}

/// Builds vote sessions: registers selectors for every undecided category's
/// options and posts one button payload per category to the group.
pub struct VoteSessionBuilder {
    registry: Arc<SelectorRegistry>,
    groups: Arc<dyn GroupMessenger>,
}

impl VoteSessionBuilder {
    pub fn new(registry: Arc<SelectorRegistry>, groups: Arc<dyn GroupMessenger>) -> Self {
        Self { registry, groups }
    }

    /// Creates category votes for every preference the user has not supplied.
    ///
    /// Sends are fire-and-forget: a transport failure is logged and the
    /// session is still considered created.
    pub async fn create_restaurant_votes(
        &self,
        group_id: &str,
        preferences: &RestaurantPreferences,
    ) -> Result<VoteSessionOutcome, ToolError> {
        let group_id = normalize_group_id(group_id)?;

        let missing = preferences.missing_categories();
        if missing.is_empty() {
            return Ok(VoteSessionOutcome::NoVotesNeeded { group_id });
        }

        for category in &missing {
            let payload = self.build_category_payload(*category);
            if let Err(error) = self.groups.send_to_group(&group_id, &payload).await {
                warn!(
                    event_name = "vote.session.send_failed",
                    group_id = %group_id,
                    category = category.key(),
                    error = %error,
                    "vote prompt delivery failed"
                );
            }
        }

        Ok(VoteSessionOutcome::VotesCreated {
            group_id,
            created_votes: missing.iter().map(|category| category.key().to_owned()).collect(),
        })
    }

    /// Posts a free-form vote: the user's exact title and options, one
    /// selector per option, a single payload.
    pub async fn create_custom_vote(
        &self,
        group_id: &str,
        title: &str,
        options: &[String],
    ) -> Result<(), ToolError> {
        let group_id = normalize_group_id(group_id)?;
        if title.trim().is_empty() {
            return Err(ToolError::validation("Vote title is required"));
        }
        if options.is_empty() {
            return Err(ToolError::validation("At least one vote option is required"));
        }

        let buttons = options
            .iter()
            .map(|option| PayloadButton::vote(option.clone(), self.registry.register(option)))
            .collect();
        let payload = GroupPayload {
            text: format!("🗳️ **{title}**\n\nPlease vote for your preference:"),
            button: buttons,
        };

        if let Err(error) = self.groups.send_to_group(&group_id, &payload).await {
            warn!(
                event_name = "vote.custom.send_failed",
                group_id = %group_id,
                error = %error,
                "custom vote delivery failed"
            );
        }
        Ok(())
    }

    fn build_category_payload(&self, category: VoteCategory) -> GroupPayload {
        let buttons = category
            .choices()
            .iter()
            .map(|choice| {
                let option_text = category.option_text(choice);
                let selector = self.registry.register(&option_text);
                PayloadButton::vote(option_text, selector)
            })
            .collect();

        GroupPayload {
            text: format!(
                "🍽️ **Restaurant Booking Vote — {}**\n\n{}",
                category.label(),
                category.prompt()
            ),
            button: buttons,
        }
    }
}

fn normalize_group_id(group_id: &str) -> Result<String, ToolError> {
    let trimmed = group_id.trim();
    if trimmed.is_empty() {
        return Err(ToolError::validation("Group ID is required for restaurant booking vote"));
    }
    Ok(trimmed.to_owned())
}
