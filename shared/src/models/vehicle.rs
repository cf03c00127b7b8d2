//! Vehicle Model

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_true() -> bool {
    true
}

/// Where a vehicle is parked
///
/// The catalog sends either a plain location string or a structured place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VehicleLocation {
    Named(String),
    Place(Place),
}

/// Structured vehicle location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl VehicleLocation {
    /// City shown on catalog cards and the detail page
    pub fn city(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Place(place) => &place.city,
        }
    }
}

/// Aggregate review rating
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ratings {
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub count: u32,
}

/// Vehicle entity (catalog entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(rename = "type", default)]
    pub vehicle_type: String,
    #[serde(default)]
    pub transmission: String,
    #[serde(default)]
    pub fuel_type: String,
    #[serde(default)]
    pub seats: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Daily rate in the single display currency
    pub price_per_day: f64,
    /// Discount percentage (10 = 10% off)
    #[serde(default)]
    pub discount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<VehicleLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub ratings: Ratings,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub featured: bool,
}

impl Vehicle {
    /// "Make Model" label
    pub fn display_name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }

    pub fn has_discount(&self) -> bool {
        self.discount > 0.0
    }

    pub fn city(&self) -> Option<&str> {
        self.location.as_ref().map(VehicleLocation::city)
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Vehicle reference inside a booking: either the id or the populated record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VehicleRef {
    Id(String),
    Populated(Box<Vehicle>),
}

impl VehicleRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Populated(vehicle) => &vehicle.id,
        }
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        match self {
            Self::Id(_) => None,
            Self::Populated(vehicle) => Some(vehicle),
        }
    }

    /// Human label, falling back to the id when not populated
    pub fn label(&self) -> String {
        match self {
            Self::Id(id) => id.clone(),
            Self::Populated(vehicle) => format!("{} ({})", vehicle.display_name(), vehicle.year),
        }
    }
}

/// Create/update vehicle payload (admin fleet form)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInput {
    #[validate(length(min = 1, message = "Make is required"))]
    pub make: String,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    #[validate(range(min = 1900, max = 2100, message = "Year must be between 1900 and 2100"))]
    pub year: i32,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub transmission: String,
    pub fuel_type: String,
    #[validate(range(min = 1, max = 20, message = "Seats must be between 1 and 20"))]
    pub seats: u32,
    #[validate(range(min = 0.0, message = "Price per day cannot be negative"))]
    pub price_per_day: f64,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub available: bool,
    pub featured: bool,
    #[validate(range(min = 0.0, max = 100.0, message = "Discount must be between 0 and 100"))]
    pub discount: f64,
    pub description: String,
    pub images: Vec<String>,
}

impl Default for VehicleInput {
    fn default() -> Self {
        Self {
            make: String::new(),
            model: String::new(),
            year: chrono::Utc::now().year(),
            vehicle_type: "sedan".to_string(),
            transmission: "automatic".to_string(),
            fuel_type: "gasoline".to_string(),
            seats: 5,
            price_per_day: 0.0,
            location: String::new(),
            available: true,
            featured: false,
            discount: 0.0,
            description: String::new(),
            images: Vec::new(),
        }
    }
}

impl From<&Vehicle> for VehicleInput {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            vehicle_type: vehicle.vehicle_type.clone(),
            transmission: vehicle.transmission.clone(),
            fuel_type: vehicle.fuel_type.clone(),
            seats: vehicle.seats,
            price_per_day: vehicle.price_per_day,
            location: vehicle.city().unwrap_or_default().to_string(),
            available: vehicle.available,
            featured: vehicle.featured,
            discount: vehicle.discount,
            description: vehicle.description.clone().unwrap_or_default(),
            images: vehicle.images.clone(),
        }
    }
}
