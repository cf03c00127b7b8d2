//! Response envelopes returned by the rental API

use serde::{Deserialize, Serialize};

use crate::models::Vehicle;

/// `GET /cars` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarListResponse {
    #[serde(default)]
    pub cars: Vec<Vehicle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
}

impl CarListResponse {
    /// Total matches, falling back to the page length
    pub fn total(&self) -> u64 {
        self.total.unwrap_or(self.cars.len() as u64)
    }
}

/// `GET /cars/{id}/availability` response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// `POST /admin/upload` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Generic acknowledgement (`DELETE /admin/cars/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
