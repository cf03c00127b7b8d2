//! Plain-text rendering for command output

use chrono::{DateTime, Utc};
use shared::models::{Booking, Profile, Review, Vehicle};
use shared::pricing::PriceQuote;
use shared::util::{format_date, format_price};

pub fn vehicle_line(vehicle: &Vehicle) -> String {
    let mut line = format!(
        "{:<26} {} ({})  {}/{}  {}/day",
        vehicle.id,
        vehicle.display_name(),
        vehicle.year,
        vehicle.vehicle_type,
        vehicle.transmission,
        format_price(vehicle.price_per_day),
    );
    if vehicle.has_discount() {
        line.push_str(&format!("  -{}%", vehicle.discount));
    }
    if let Some(city) = vehicle.city() {
        line.push_str(&format!("  {}", city));
    }
    if !vehicle.available {
        line.push_str("  [unavailable]");
    }
    line
}

pub fn vehicle_details(vehicle: &Vehicle) -> Vec<String> {
    let mut lines = vec![
        format!("{} ({})", vehicle.display_name(), vehicle.year),
        format!(
            "Type: {}  Transmission: {}  Fuel: {}  Seats: {}",
            vehicle.vehicle_type, vehicle.transmission, vehicle.fuel_type, vehicle.seats
        ),
        format!("Price: {}/day", format_price(vehicle.price_per_day)),
    ];
    if vehicle.has_discount() {
        lines.push(format!("Discount: {}%", vehicle.discount));
    }
    if let Some(city) = vehicle.city() {
        lines.push(format!("Location: {}", city));
    }
    if vehicle.ratings.count > 0 {
        lines.push(format!(
            "Rating: {:.1} ({} reviews)",
            vehicle.ratings.average, vehicle.ratings.count
        ));
    }
    if !vehicle.features.is_empty() {
        lines.push(format!("Features: {}", vehicle.features.join(", ")));
    }
    if let Some(description) = vehicle.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(description.to_string());
    }
    lines
}

pub fn review_line(review: &Review) -> String {
    format!("{}  {}  {}", review.stars(), review.author_name(), review.comment)
}

pub fn booking_line(booking: &Booking) -> String {
    let mut line = format!(
        "{:<8}  {}  {} → {}  {} days  {}  {}",
        booking.short_id(),
        booking.car.label(),
        format_date(booking.start_date),
        format_date(booking.end_date),
        booking.days(),
        format_price(booking.total_price),
        booking.status,
    );
    if let Some(customer) = &booking.user {
        line.push_str(&format!("  {}", customer.label()));
    }
    line
}

pub fn profile_line(profile: &Profile) -> String {
    format!(
        "{:<26} {:<24} {:<28} {}",
        profile.id,
        profile.full_name(),
        profile.email,
        if profile.is_admin() { "admin" } else { "user" }
    )
}

pub fn range(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!("{} → {}", format_date(start), format_date(end))
}

/// Price breakdown as shown on the booking summary
pub fn quote_lines(quote: &PriceQuote) -> Vec<String> {
    let mut lines = vec![
        format!("Base ({} days): {}", quote.days, format_price(quote.base_cost)),
        format!("Add-ons: {}", format_price(quote.add_on_cost)),
        format!("Subtotal: {}", format_price(quote.subtotal)),
    ];
    if quote.discount_amount > 0.0 {
        lines.push(format!("Discount: -{}", format_price(quote.discount_amount)));
    }
    lines.push(format!("Total: {}", format_price(quote.total)));
    lines
}
