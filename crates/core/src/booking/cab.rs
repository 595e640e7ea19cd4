use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::ToolError;

const BOOKING_FEE: f64 = 2.0;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CabRequest {
    pub pickup_location: String,
    pub destination: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub passengers: Option<u32>,
    pub cab_type: Option<String>,
    pub payment_method: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub model: String,
    pub color: String,
    pub year: String,
    pub plate_number: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CabBooking {
    pub booking_id: String,
    pub company: String,
    pub driver_name: String,
    pub driver_rating: f64,
    pub vehicle_info: VehicleInfo,
    pub pickup_location: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub passengers: u32,
    pub cab_type: String,
    pub distance_km: f64,
    pub estimated_duration_minutes: u32,
    pub base_fare: f64,
    pub booking_fee: f64,
    pub total_fare: f64,
    pub payment_method: String,
}

pub fn book_cab(request: &CabRequest) -> Result<CabBooking, ToolError> {
    let pickup = request.pickup_location.trim();
    if pickup.is_empty() {
        return Err(ToolError::validation("Pickup location is required"));
    }
    let destination = request.destination.trim();
    if destination.is_empty() {
        return Err(ToolError::validation("Destination is required"));
    }

    let passengers = match request.passengers {
        Some(count) if count > 6 => {
            return Err(ToolError::validation("Maximum 6 passengers allowed per cab"))
        }
        Some(count) => count.max(1),
        None => 1,
    };

    let cab_type = normalize_choice(
        request.cab_type.as_deref(),
        &["standard", "premium", "luxury", "van", "bike"],
        "standard",
    );
    let payment_method = normalize_choice(
        request.payment_method.as_deref(),
        &["card", "cash", "digital_wallet"],
        "card",
    );

    let mut rng = rand::thread_rng();
    let date = match request.date.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value.to_owned(),
        _ => chrono::Local::now().format("%Y-%m-%d").to_string(),
    };
    let time = match request.time.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value.to_owned(),
        _ => chrono::Local::now().format("%H:%M").to_string(),
    };

    let distance_km = simulate_distance(pickup, destination, &mut rng);
    let per_km = match cab_type.as_str() {
        "standard" => 2.5,
        "premium" => 4.0,
        "luxury" => 6.0,
        "van" => 3.5,
        "bike" => 1.5,
        _ => 2.5,
    };
    let base_fare = per_km * distance_km;

    Ok(CabBooking {
        booking_id: format!("CAB-{}", rng.gen_range(100_000..=999_999)),
        company: pick_company(pickup, &mut rng),
        driver_name: pick_driver(&mut rng),
        driver_rating: round1(rng.gen_range(4.2..=5.0)),
        vehicle_info: vehicle_for(&cab_type, &mut rng),
        pickup_location: pickup.to_owned(),
        destination: destination.to_owned(),
        date,
        time,
        passengers,
        cab_type,
        distance_km: round1(distance_km),
        estimated_duration_minutes: (distance_km * 2.5) as u32,
        base_fare: round2(base_fare),
        booking_fee: BOOKING_FEE,
        total_fare: round2(base_fare + BOOKING_FEE),
        payment_method,
    })
}

pub fn format_confirmation(booking: &CabBooking) -> String {
    format!(
        "✅ Cab booking confirmed!\n\n🚕 Company: {}\n👨‍💼 Driver: {} (⭐ {})\n🚗 Vehicle: {} ({}, {})\n📍 Pickup: {}\n🎯 Destination: {}\n📅 Date: {}\n🕐 Time: {}\n👥 Passengers: {}\n🚙 Cab Type: {}\n📏 Distance: {} km\n⏱️ Duration: ~{} minutes\n💰 Base Fare: ${}\n💳 Booking Fee: ${}\n💵 Total Fare: ${}\n💳 Payment: {}\n🆔 Booking ID: {}",
        booking.company,
        booking.driver_name,
        booking.driver_rating,
        booking.vehicle_info.model,
        booking.vehicle_info.color,
        booking.vehicle_info.year,
        booking.pickup_location,
        booking.destination,
        booking.date,
        booking.time,
        booking.passengers,
        title_case(&booking.cab_type),
        booking.distance_km,
        booking.estimated_duration_minutes,
        booking.base_fare,
        booking.booking_fee,
        booking.total_fare,
        title_case(&booking.payment_method),
        booking.booking_id,
    )
}

fn normalize_choice(raw: Option<&str>, allowed: &[&str], fallback: &str) -> String {
    let candidate = raw.map(str::trim).unwrap_or_default().to_ascii_lowercase();
    if allowed.contains(&candidate.as_str()) {
        candidate
    } else {
        fallback.to_owned()
    }
}

/// Keyword-sensitive simulated distance; a mapping API would sit here in a
/// real system.
fn simulate_distance(pickup: &str, destination: &str, rng: &mut impl Rng) -> f64 {
    let combined = format!("{} {}", pickup.to_ascii_lowercase(), destination.to_ascii_lowercase());
    let (low, high) = if combined.contains("airport") {
        (15.0, 45.0)
    } else if combined.contains("downtown") {
        (5.0, 20.0)
    } else if combined.contains("suburb") {
        (10.0, 35.0)
    } else {
        (3.0, 25.0)
    };
    rng.gen_range(low..=high)
}

fn pick_company(pickup: &str, rng: &mut impl Rng) -> String {
    let pickup = pickup.to_ascii_lowercase();
    let companies: &[&str] = if pickup.contains("beijing") {
        &["Beijing Taxi Co.", "Didi Chuxing", "Beijing Express"]
    } else if pickup.contains("london") {
        &["London Black Cabs", "Uber London", "Addison Lee"]
    } else if pickup.contains("new york") {
        &["Yellow Cab NYC", "Uber NYC", "Lyft NYC"]
    } else {
        &["City Taxi", "Express Cab", "Metro Ride"]
    };
    (*companies.choose(rng).expect("company lists are non-empty")).to_owned()
}

fn pick_driver(rng: &mut impl Rng) -> String {
    const DRIVERS: [&str; 8] = [
        "John Smith",
        "Maria Garcia",
        "Ahmed Hassan",
        "Li Wei",
        "Sarah Johnson",
        "Carlos Rodriguez",
        "Priya Patel",
        "David Kim",
    ];
    (*DRIVERS.choose(rng).expect("driver list is non-empty")).to_owned()
}

fn vehicle_for(cab_type: &str, rng: &mut impl Rng) -> VehicleInfo {
    let (model, color, year, prefix) = match cab_type {
        "premium" => ("Mercedes E-Class", "Black", "2023", 'P'),
        "luxury" => ("BMW 7 Series", "Silver", "2023", 'L'),
        "van" => ("Toyota Sienna", "Blue", "2022", 'V'),
        "bike" => ("Honda CB150R", "Red", "2023", 'B'),
        _ => ("Toyota Camry", "White", "2022", 'T'),
    };
    VehicleInfo {
        model: model.to_owned(),
        color: color.to_owned(),
        year: year.to_owned(),
        plate_number: format!("{prefix}{}", rng.gen_range(1_000..=9_999)),
    }
}

fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
