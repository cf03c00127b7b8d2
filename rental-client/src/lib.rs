//! Rental Client - typed client and view state for the car rental API
//!
//! Provides the HTTP transport, the [`RentalApi`] trait over every endpoint,
//! and the per-screen state machines (catalog, detail, booking wizard,
//! dashboards) that front ends drive.

pub mod api;
pub mod availability;
pub mod booking;
pub mod config;
pub mod error;
pub mod http;
pub mod task;
pub mod views;

#[cfg(test)]
mod testing;

pub use api::{RentalApi, UploadFile};
pub use availability::AvailabilityChecker;
pub use booking::{BookingFlow, BookingForm, BookingStep, BookingSummary, FormAction};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use task::{TaskSlot, TaskState};

// Re-export shared types for convenience
pub use shared::client::{AvailabilityResponse, CarListResponse, UploadResponse};
pub use shared::models::{Booking, BookingStatus, Profile, Vehicle};
