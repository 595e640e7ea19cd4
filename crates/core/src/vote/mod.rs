//! Group voting: selector registry, message log, session builder, tally.
//!
//! A vote session posts one button-list payload per undecided category.
//! Each button carries an opaque selector; tapping it echoes the selector
//! back into the group, where it lands in the [`MessageLog`]. The tally
//! engine later resolves logged selectors against the [`SelectorRegistry`]
//! and reduces them to one winning option per category.

pub mod log;
pub mod registry;
pub mod session;
pub mod tally;

pub use log::{GroupMessage, MessageLog};
pub use registry::SelectorRegistry;
pub use session::{RestaurantPreferences, VoteCategory, VoteSessionBuilder, VoteSessionOutcome};
pub use tally::{TallyEngine, VoteTally};
