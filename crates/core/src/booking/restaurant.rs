use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::ToolError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RestaurantRequest {
    pub location: String,
    pub date: String,
    pub time: String,
    pub guests: Option<u32>,
    pub cuisine: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantBooking {
    pub reservation_id: String,
    pub restaurant: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub guests: u32,
    pub cuisine: String,
    pub total_estimated_price: i64,
}

pub fn book_restaurant(request: &RestaurantRequest) -> Result<RestaurantBooking, ToolError> {
    let location = request.location.trim();
    if location.is_empty() {
        return Err(ToolError::validation("Location is required"));
    }
    if request.date.trim().is_empty() || request.time.trim().is_empty() {
        return Err(ToolError::validation("Date and time are required"));
    }

    let guests = request.guests.unwrap_or(2).max(1);
    let cuisine = match request.cuisine.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value.to_ascii_lowercase(),
        _ => "international".to_owned(),
    };

    let per_head = match cuisine.as_str() {
        "international" => 30,
        "chinese" => 25,
        "indian" => 20,
        "french" => 40,
        _ => 30,
    };

    let mut rng = rand::thread_rng();
    Ok(RestaurantBooking {
        reservation_id: format!("RSV-{}", rng.gen_range(100_000..=999_999)),
        restaurant: pick_restaurant(location, &mut rng),
        location: location.to_owned(),
        date: request.date.trim().to_owned(),
        time: request.time.trim().to_owned(),
        guests,
        cuisine,
        total_estimated_price: per_head * i64::from(guests),
    })
}

pub fn format_confirmation(booking: &RestaurantBooking) -> String {
    format!(
        "✅ Restaurant reservation confirmed!\n\n🍽️ Restaurant: {}\n📍 Location: {}\n📅 Date: {}\n🕐 Time: {}\n👥 Guests: {}\n🍴 Cuisine: {}\n💰 Estimated Total: ${}\n🆔 Reservation ID: {}",
        booking.restaurant,
        booking.location,
        booking.date,
        booking.time,
        booking.guests,
        booking.cuisine,
        booking.total_estimated_price,
        booking.reservation_id,
    )
}

fn pick_restaurant(location: &str, rng: &mut impl Rng) -> String {
    let known: &[&str] = match location {
        "Beijing" => &["Peking Duck House", "Lotus Garden", "Dragon Palace"],
        "London" => &["The Ivy", "Dishoom", "Sketch"],
        "New York" => &["Le Bernardin", "Katz's Delicatessen", "Gramercy Tavern"],
        _ => return format!("{location} Bistro"),
    };
    (*known.choose(rng).expect("restaurant lists are non-empty")).to_owned()
}
