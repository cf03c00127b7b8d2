//! Booking Model

use crate::error::{AppError, AppResult, ErrorCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::VehicleRef;

/// Booking lifecycle status
///
/// ```text
/// pending ──► confirmed ──► completed
///    │            │
///    └──► cancelled ◄──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Capitalized label for display
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Statuses reachable in one step from this one
    pub const fn next_statuses(&self) -> &'static [BookingStatus] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, target: BookingStatus) -> bool {
        self.next_statuses().contains(&target)
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Pending or confirmed: the rental is still upcoming or running
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Check a requested status change before it is sent to the API
    pub fn validate_transition(&self, target: BookingStatus) -> AppResult<()> {
        if self.can_transition_to(target) {
            return Ok(());
        }
        match self {
            Self::Cancelled => Err(AppError::new(ErrorCode::BookingAlreadyCancelled)),
            Self::Completed => Err(AppError::new(ErrorCode::BookingAlreadyCompleted)),
            _ => Err(AppError::invalid_transition(self.as_str(), target.as_str())),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(AppError::invalid_request(format!(
                "Unknown booking status: {}",
                other
            ))),
        }
    }
}

/// Payment method chosen at the payment step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    DebitCard,
    Paypal,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Paypal => "paypal",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::Paypal => "PayPal",
        }
    }

    /// Card payments collect a billing address
    pub const fn is_card(&self) -> bool {
        matches!(self, Self::CreditCard | Self::DebitCard)
    }
}

impl FromStr for PaymentMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "credit_card" | "credit" => Ok(Self::CreditCard),
            "debit_card" | "debit" => Ok(Self::DebitCard),
            "paypal" => Ok(Self::Paypal),
            _ => Err(AppError::new(ErrorCode::PaymentInvalidMethod)),
        }
    }
}

/// Street address used for pickup, dropoff and billing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
}

impl Address {
    /// Address line and city are both filled in
    pub fn is_complete(&self) -> bool {
        !self.address.trim().is_empty() && !self.city.trim().is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [
            self.address.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.zip_code.as_str(),
        ]
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
        f.write_str(&parts.join(", "))
    }
}

/// An add-on service attached to a booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOnSelection {
    pub name: String,
    /// Per-day price
    pub price: f64,
}

/// Customer reference inside a booking (admin listings populate it)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerRef {
    Id(String),
    Populated(CustomerSummary),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl CustomerRef {
    pub fn label(&self) -> String {
        match self {
            Self::Id(id) => id.clone(),
            Self::Populated(c) => format!("{} {}", c.first_name, c.last_name).trim().to_string(),
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Populated(c) => Some(c.email.as_str()).filter(|e| !e.is_empty()),
        }
    }
}

/// Booking entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub car: VehicleRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<CustomerRef>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_location: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff_location: Option<Address>,
    #[serde(default)]
    pub additional_services: Vec<AddOnSelection>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    pub total_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// First eight characters of the id, as shown in tables
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    /// Rental length, preferring the server's value
    pub fn days(&self) -> u32 {
        self.total_days
            .unwrap_or_else(|| crate::pricing::rental_days(self.start_date, self.end_date))
    }
}

/// Create booking payload (`POST /bookings`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Vehicle id
    pub car: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub pickup_location: Address,
    pub dropoff_location: Address,
    pub payment_method: PaymentMethod,
    pub additional_services: Vec<AddOnSelection>,
    pub special_requests: String,
}

/// Status change payload (`PUT …/bookings/{id}/status`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}
