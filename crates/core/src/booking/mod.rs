//! Simulated booking calculators.
//!
//! Each calculator validates its request, fabricates a plausible result from
//! canned data plus a dash of randomness, and exposes a pure confirmation
//! formatter. No calculator holds state or talks to the outside world.

pub mod cab;
pub mod flight;
pub mod hotel;
pub mod restaurant;

pub use cab::{book_cab, CabBooking, CabRequest};
pub use flight::{book_flight, FlightBooking, FlightRequest};
pub use hotel::{book_hotel, HotelBooking, HotelRequest};
pub use restaurant::{book_restaurant, RestaurantBooking, RestaurantRequest};
