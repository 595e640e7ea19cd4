use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::ToolError;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct HotelRequest {
    pub location: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: Option<u32>,
    pub room_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelBooking {
    pub confirmation_id: String,
    pub hotel: String,
    pub location: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    pub room_type: String,
    pub nights: i64,
    pub total_price: i64,
}

pub fn book_hotel(request: &HotelRequest) -> Result<HotelBooking, ToolError> {
    let location = request.location.trim();
    if location.is_empty() {
        return Err(ToolError::validation("Location is required"));
    }
    if request.check_in.trim().is_empty() || request.check_out.trim().is_empty() {
        return Err(ToolError::validation("Check-in and check-out dates are required"));
    }

    let check_in = parse_date(&request.check_in)?;
    let check_out = parse_date(&request.check_out)?;
    let nights = (check_out - check_in).num_days();
    if nights < 1 {
        return Err(ToolError::validation("Check-out date must be after check-in date"));
    }

    let guests = request.guests.unwrap_or(1).max(1);
    let room_type = match request.room_type.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value.to_owned(),
        _ => "standard".to_owned(),
    };

    let nightly_base = match room_type.as_str() {
        "standard" => 100,
        "deluxe" => 180,
        "suite" => 300,
        _ => 120,
    };

    let mut rng = rand::thread_rng();
    Ok(HotelBooking {
        confirmation_id: format!("BK-{}", rng.gen_range(100_000..=999_999)),
        hotel: pick_hotel(location, &mut rng),
        location: location.to_owned(),
        check_in: request.check_in.trim().to_owned(),
        check_out: request.check_out.trim().to_owned(),
        guests,
        room_type,
        nights,
        total_price: nightly_base * nights * i64::from(guests),
    })
}

pub fn format_confirmation(booking: &HotelBooking) -> String {
    format!(
        "✅ Hotel booking confirmed!\n\n🏨 Hotel: {}\n📍 Location: {}\n📅 Check-in: {}\n📅 Check-out: {}\n👥 Guests: {}\n🛏️ Room Type: {}\n🌙 Nights: {}\n💰 Total Price: ${}\n🆔 Confirmation ID: {}",
        booking.hotel,
        booking.location,
        booking.check_in,
        booking.check_out,
        booking.guests,
        booking.room_type,
        booking.nights,
        booking.total_price,
        booking.confirmation_id,
    )
}

fn parse_date(raw: &str) -> Result<NaiveDate, ToolError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|error| {
        ToolError::validation(format!(
            "Invalid date format. Please use YYYY-MM-DD format. Error: {error}"
        ))
    })
}

fn pick_hotel(location: &str, rng: &mut impl Rng) -> String {
    let known: &[&str] = match location {
        "Beijing" => &["Beijing Grand Hotel", "Great Wall Inn", "Forbidden City Hotel"],
        "London" => &["The Savoy", "The Ritz", "Park Plaza"],
        "New York" => &["Plaza Hotel", "The Langham", "Times Square Inn"],
        _ => return format!("{location} International Hotel"),
    };
    (*known.choose(rng).expect("hotel lists are non-empty")).to_owned()
}

#[cfg(test)]
mod tests {
    use super::{book_hotel, format_confirmation, HotelRequest};
    use crate::errors::ToolError;

    fn request() -> HotelRequest {
        HotelRequest {
            location: "London".to_owned(),
            check_in: "2024-03-01".to_owned(),
            check_out: "2024-03-04".to_owned(),
            guests: Some(2),
            room_type: Some("deluxe".to_owned()),
        }
    }

    #[test]
    fn prices_nights_times_guests_times_room_base() {
        let booking = book_hotel(&request()).expect("booking should succeed");

        assert_eq!(booking.nights, 3);
        assert_eq!(booking.total_price, 180 * 3 * 2);
        assert!(booking.confirmation_id.starts_with("BK-"));
        assert!(["The Savoy", "The Ritz", "Park Plaza"].contains(&booking.hotel.as_str()));
    }

    #[test]
    fn unknown_location_gets_fallback_hotel_and_base_rate() {
        let booking = book_hotel(&HotelRequest {
            location: "Reykjavik".to_owned(),
            room_type: Some("cabin".to_owned()),
            guests: None,
            ..request()
        })
        .expect("booking should succeed");

        assert_eq!(booking.hotel, "Reykjavik International Hotel");
        assert_eq!(booking.guests, 1);
        assert_eq!(booking.total_price, 120 * 3);
    }

    #[test]
    fn rejects_checkout_before_checkin() {
        let result = book_hotel(&HotelRequest {
            check_in: "2024-03-04".to_owned(),
            check_out: "2024-03-01".to_owned(),
            ..request()
        });

        assert_eq!(
            result,
            Err(ToolError::validation("Check-out date must be after check-in date"))
        );
    }

    #[test]
    fn rejects_unparseable_dates() {
        let result = book_hotel(&HotelRequest { check_in: "March 1st".to_owned(), ..request() });
        assert!(matches!(result, Err(ToolError::Validation(message)) if message.contains("YYYY-MM-DD")));
    }

    #[test]
    fn rejects_blank_location() {
        let result = book_hotel(&HotelRequest { location: "  ".to_owned(), ..request() });
        assert_eq!(result, Err(ToolError::validation("Location is required")));
    }

    #[test]
    fn confirmation_lists_every_field() {
        let booking = book_hotel(&request()).expect("booking should succeed");
        let text = format_confirmation(&booking);

        assert!(text.starts_with("✅ Hotel booking confirmed!"));
        assert!(text.contains("🌙 Nights: 3"));
        assert!(text.contains(&booking.confirmation_id));
    }
}
