//! Typed rental API
//!
//! [`RentalApi`] is the seam between views and the transport: views are
//! generic over it, [`HttpClient`] implements it over `reqwest`.

use crate::{ClientError, ClientResult, HttpClient};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use shared::client::{AvailabilityResponse, CarListResponse, UploadResponse};
use shared::models::{
    Booking, BookingStatus, CreateBookingRequest, Profile, ProfileUpdate, Review, StatusUpdateRequest, Vehicle,
    VehicleInput,
};
use shared::request::{AvailabilityQuery, BookingListQuery, CarQuery};
use std::path::Path;

/// Reason sent when a customer cancels their own booking
pub const CUSTOMER_CANCELLATION_REASON: &str = "Customer requested cancellation";

/// Multipart field name for vehicle images
pub const UPLOAD_FIELD: &str = "images";

/// An image queued for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk, guessing its content type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::Config(format!("Not a file path: {}", path.display())))?;
        Ok(Self::new(file_name, bytes))
    }
}

/// Every endpoint the client uses
#[async_trait]
pub trait RentalApi: Send + Sync {
    // ========== Catalog ==========

    async fn list_cars(&self, query: &CarQuery) -> ClientResult<CarListResponse>;
    async fn get_car(&self, id: &str) -> ClientResult<Vehicle>;
    async fn similar_cars(&self, id: &str) -> ClientResult<Vec<Vehicle>>;
    async fn car_reviews(&self, id: &str) -> ClientResult<Vec<Review>>;
    async fn check_availability(&self, id: &str, query: AvailabilityQuery) -> ClientResult<AvailabilityResponse>;

    // ========== Customer ==========

    async fn create_booking(&self, request: &CreateBookingRequest) -> ClientResult<Booking>;
    async fn my_bookings(&self, query: BookingListQuery) -> ClientResult<Vec<Booking>>;
    /// Cancel one of the caller's own bookings
    async fn cancel_booking(&self, id: &str) -> ClientResult<()>;
    async fn get_profile(&self) -> ClientResult<Profile>;
    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<Profile>;

    // ========== Admin ==========

    async fn admin_cars(&self) -> ClientResult<Vec<Vehicle>>;
    async fn create_car(&self, input: &VehicleInput) -> ClientResult<Vehicle>;
    async fn update_car(&self, id: &str, input: &VehicleInput) -> ClientResult<Vehicle>;
    async fn delete_car(&self, id: &str) -> ClientResult<()>;
    async fn admin_bookings(&self) -> ClientResult<Vec<Booking>>;
    async fn set_booking_status(&self, id: &str, status: BookingStatus) -> ClientResult<()>;
    async fn admin_users(&self) -> ClientResult<Vec<Profile>>;
    async fn upload_images(&self, files: Vec<UploadFile>) -> ClientResult<UploadResponse>;
}

#[async_trait]
impl RentalApi for HttpClient {
    async fn list_cars(&self, query: &CarQuery) -> ClientResult<CarListResponse> {
        self.get_query("/cars", &query.to_query_pairs()).await
    }

    async fn get_car(&self, id: &str) -> ClientResult<Vehicle> {
        self.get(&format!("/cars/{}", id)).await
    }

    async fn similar_cars(&self, id: &str) -> ClientResult<Vec<Vehicle>> {
        self.get(&format!("/cars/{}/similar", id)).await
    }

    async fn car_reviews(&self, id: &str) -> ClientResult<Vec<Review>> {
        self.get(&format!("/cars/{}/reviews", id)).await
    }

    async fn check_availability(&self, id: &str, query: AvailabilityQuery) -> ClientResult<AvailabilityResponse> {
        self.get_query(&format!("/cars/{}/availability", id), &query.to_query_pairs()[..])
            .await
    }

    async fn create_booking(&self, request: &CreateBookingRequest) -> ClientResult<Booking> {
        self.post("/bookings", request).await
    }

    async fn my_bookings(&self, query: BookingListQuery) -> ClientResult<Vec<Booking>> {
        self.get_query("/bookings/user", &query.to_query_pairs()).await
    }

    async fn cancel_booking(&self, id: &str) -> ClientResult<()> {
        let body = StatusUpdateRequest {
            status: BookingStatus::Cancelled,
            cancellation_reason: Some(CUSTOMER_CANCELLATION_REASON.to_string()),
        };
        self.put_ack(&format!("/bookings/{}/status", id), &body).await
    }

    async fn get_profile(&self) -> ClientResult<Profile> {
        self.get("/users/profile").await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<Profile> {
        self.put("/users/profile", update).await
    }

    async fn admin_cars(&self) -> ClientResult<Vec<Vehicle>> {
        self.get("/admin/cars").await
    }

    async fn create_car(&self, input: &VehicleInput) -> ClientResult<Vehicle> {
        self.post("/admin/cars", input).await
    }

    async fn update_car(&self, id: &str, input: &VehicleInput) -> ClientResult<Vehicle> {
        self.put(&format!("/admin/cars/{}", id), input).await
    }

    async fn delete_car(&self, id: &str) -> ClientResult<()> {
        self.delete_ack(&format!("/admin/cars/{}", id)).await
    }

    async fn admin_bookings(&self) -> ClientResult<Vec<Booking>> {
        self.get("/admin/bookings").await
    }

    async fn set_booking_status(&self, id: &str, status: BookingStatus) -> ClientResult<()> {
        let body = StatusUpdateRequest {
            status,
            cancellation_reason: None,
        };
        self.put_ack(&format!("/admin/bookings/{}/status", id), &body).await
    }

    async fn admin_users(&self) -> ClientResult<Vec<Profile>> {
        self.get("/admin/users").await
    }

    async fn upload_images(&self, files: Vec<UploadFile>) -> ClientResult<UploadResponse> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)?;
            form = form.part(UPLOAD_FIELD, part);
        }
        self.post_multipart("/admin/upload", form).await
    }
}
