//! Chat bridge - group-messaging transports and inbound event routing
//!
//! This crate connects concierge to the group-chat platform:
//! - **Messengers** (`messenger`) - `send_to_user` / `send_to_group`
//!   transports: an HTTP bridge client and a no-op stand-in
//! - **Events** (`events`) - inbound callback events routed to handlers:
//!   group messages land in the message log (vote clicks included),
//!   direct messages drive an agent turn
//!
//! The payload data contract (`text` + `button` list) lives in
//! `concierge_core::outbound`; this crate only moves payloads around.

pub mod events;
pub mod messenger;

pub use events::{
    EventContext, EventDispatcher, EventHandler, HandlerResult, InboundEvent, MessageSink,
};
pub use messenger::{HttpMessenger, NoopMessenger};
