pub mod booking;
pub mod config;
pub mod errors;
pub mod outbound;
pub mod tools;
pub mod vote;

pub use booking::{
    CabBooking, CabRequest, FlightBooking, FlightRequest, HotelBooking, HotelRequest,
    RestaurantBooking, RestaurantRequest,
};
pub use errors::ToolError;
pub use outbound::{GroupMessenger, GroupPayload, PayloadButton, SendError, UserMessenger};
pub use tools::{is_excluded, spec_for, ToolArgs, ToolSpec, Toolbox, EXCLUDED_TOOLS, TOOL_SPECS};
pub use vote::{
    GroupMessage, MessageLog, RestaurantPreferences, SelectorRegistry, TallyEngine, VoteCategory,
    VoteSessionBuilder, VoteSessionOutcome, VoteTally,
};
