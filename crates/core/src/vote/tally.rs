use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::ToolError;
use crate::vote::log::MessageLog;
use crate::vote::registry::SelectorRegistry;

/// Vote counts for one registered option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionVotes {
    pub option: String,
    pub votes: usize,
}

/// The winning choice for one category, prefix stripped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWinner {
    pub category: String,
    pub value: String,
}

/// Tally outcome for one group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VoteTally {
    NoVotesFound,
    VoteResults {
        /// Per-option counts, ordered by first appearance in the log.
        results: Vec<OptionVotes>,
        /// One winner per category that received at least one vote.
        winning_options: Vec<CategoryWinner>,
    },
}

impl VoteTally {
    pub fn count_for(&self, option: &str) -> Option<usize> {
        match self {
            Self::NoVotesFound => None,
            Self::VoteResults { results, .. } => {
                results.iter().find(|entry| entry.option == option).map(|entry| entry.votes)
            }
        }
    }

    pub fn winner_for(&self, category_key: &str) -> Option<&str> {
        match self {
            Self::NoVotesFound => None,
            Self::VoteResults { winning_options, .. } => winning_options
                .iter()
                .find(|winner| winner.category == category_key)
                .map(|winner| winner.value.as_str()),
        }
    }
}

/// Counts vote clicks for a group and reduces them to per-category winners.
///
/// Only messages whose text resolves through the selector registry count;
/// everything else in the log (chatter, unknown selectors) is skipped.
pub struct TallyEngine {
    registry: Arc<SelectorRegistry>,
    log: Arc<MessageLog>,
}

impl TallyEngine {
    pub fn new(registry: Arc<SelectorRegistry>, log: Arc<MessageLog>) -> Self {
        Self { registry, log }
    }

    pub fn tally(&self, group_id: &str) -> Result<VoteTally, ToolError> {
        let group_id = group_id.trim();
        if group_id.is_empty() {
            return Err(ToolError::validation("Group ID is required"));
        }

        // Ordered counting pass: option order is first appearance in the log,
        // which makes the max-by-count reduction below deterministic.
        let mut results: Vec<OptionVotes> = Vec::new();
        for message in self.log.for_group(group_id) {
            let Some(option) = self.registry.resolve(&message.text) else {
                continue;
            };
            match results.iter_mut().find(|entry| entry.option == option) {
                Some(entry) => entry.votes += 1,
                None => results.push(OptionVotes { option, votes: 1 }),
            }
        }

        if results.is_empty() {
            return Ok(VoteTally::NoVotesFound);
        }

        let winning_options = pick_winners(&results);
        Ok(VoteTally::VoteResults { results, winning_options })
    }
}

/// Highest count wins per category; on a tie the earlier-seen option keeps
/// the crown.
fn pick_winners(results: &[OptionVotes]) -> Vec<CategoryWinner> {
    let mut winners: Vec<(String, &OptionVotes)> = Vec::new();

    for entry in results {
        let Some((category, _)) = split_option(&entry.option) else {
            continue;
        };
        match winners.iter_mut().find(|(key, _)| *key == category) {
            Some((_, best)) => {
                if entry.votes > best.votes {
                    *best = entry;
                }
            }
            None => winners.push((category, entry)),
        }
    }

    winners
        .into_iter()
        .map(|(category, best)| {
            let value = split_option(&best.option)
                .map(|(_, value)| value)
                .unwrap_or_else(|| best.option.clone());
            CategoryWinner { category, value }
        })
        .collect()
}

/// Splits `"Location: London"` into `("location", "London")`.
fn split_option(option: &str) -> Option<(String, String)> {
    let (prefix, value) = option.split_once(": ")?;
    Some((prefix.to_ascii_lowercase(), value.to_owned()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{TallyEngine, VoteTally};
    use crate::errors::ToolError;
    use crate::vote::log::{GroupMessage, MessageLog};
    use crate::vote::registry::SelectorRegistry;

    fn engine() -> (Arc<SelectorRegistry>, Arc<MessageLog>, TallyEngine) {
        let registry = Arc::new(SelectorRegistry::new());
        let log = Arc::new(MessageLog::new());
        let engine = TallyEngine::new(Arc::clone(&registry), Arc::clone(&log));
        (registry, log, engine)
    }

    fn cast_votes(log: &MessageLog, group_id: &str, selector: &str, count: usize) {
        for index in 0..count {
            log.append(GroupMessage::new(group_id, format!("member-{index}"), selector));
        }
    }

    #[test]
    fn empty_log_reports_no_votes_found() {
        let (_, _, engine) = engine();
        let tally = engine.tally("G1").expect("tally should succeed");
        assert_eq!(tally, VoteTally::NoVotesFound);
    }

    #[test]
    fn counts_resolved_selectors_and_picks_category_winner() {
        let (registry, log, engine) = engine();
        let london = registry.register("Location: London");
        let beijing = registry.register("Location: Beijing");
        registry.register("Location: New York");
        registry.register("Location: Other");

        cast_votes(&log, "G1", &london, 5);
        cast_votes(&log, "G1", &beijing, 2);
        log.append(GroupMessage::new("G1", "dave", "not a vote click"));

        let tally = engine.tally("G1").expect("tally should succeed");
        assert_eq!(tally.count_for("Location: London"), Some(5));
        assert_eq!(tally.count_for("Location: Beijing"), Some(2));
        assert_eq!(tally.winner_for("location"), Some("London"));
    }

    #[test]
    fn tie_goes_to_first_option_seen_in_the_log() {
        let (registry, log, engine) = engine();
        let first = registry.register("Cuisine: French");
        let second = registry.register("Cuisine: Chinese");

        cast_votes(&log, "G1", &first, 3);
        cast_votes(&log, "G1", &second, 3);

        let tally = engine.tally("G1").expect("tally should succeed");
        assert_eq!(tally.winner_for("cuisine"), Some("French"));
    }

    #[test]
    fn categories_are_tallied_independently() {
        let (registry, log, engine) = engine();
        let tomorrow = registry.register("Date: Tomorrow");
        let seven = registry.register("Time: 19:00 (7 PM)");
        let eight = registry.register("Time: 20:00 (8 PM)");

        cast_votes(&log, "G1", &tomorrow, 4);
        cast_votes(&log, "G1", &seven, 6);
        cast_votes(&log, "G1", &eight, 2);

        let tally = engine.tally("G1").expect("tally should succeed");
        assert_eq!(tally.winner_for("date"), Some("Tomorrow"));
        assert_eq!(tally.winner_for("time"), Some("19:00 (7 PM)"));
    }

    #[test]
    fn votes_from_other_groups_do_not_leak() {
        let (registry, log, engine) = engine();
        let london = registry.register("Location: London");
        let beijing = registry.register("Location: Beijing");

        cast_votes(&log, "G1", &london, 1);
        cast_votes(&log, "G2", &beijing, 9);

        let tally = engine.tally("G1").expect("tally should succeed");
        assert_eq!(tally.winner_for("location"), Some("London"));
        assert_eq!(tally.count_for("Location: Beijing"), None);
    }

    #[test]
    fn blank_group_id_is_a_validation_error() {
        let (_, _, engine) = engine();
        assert!(matches!(engine.tally(""), Err(ToolError::Validation(_))));
    }
}
