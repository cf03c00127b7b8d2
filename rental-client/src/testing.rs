//! In-memory [`RentalApi`] for unit tests

use crate::api::{RentalApi, UploadFile};
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use http::StatusCode;
use shared::client::{AvailabilityResponse, CarListResponse, UploadResponse};
use shared::models::{
    Booking, BookingStatus, CreateBookingRequest, PaymentMethod, Profile, ProfileUpdate, Ratings, Review,
    Vehicle, VehicleInput, VehicleLocation, VehicleRef,
};
use shared::request::{AvailabilityQuery, BookingListQuery, CarQuery};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn vehicle(id: &str, make: &str, model: &str, rate: f64, discount: f64) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        make: make.to_string(),
        model: model.to_string(),
        year: 2022,
        vehicle_type: "sedan".to_string(),
        transmission: "automatic".to_string(),
        fuel_type: "gasoline".to_string(),
        seats: 5,
        color: None,
        price_per_day: rate,
        discount,
        location: Some(VehicleLocation::Named("Austin".to_string())),
        description: None,
        features: Vec::new(),
        images: Vec::new(),
        ratings: Ratings::default(),
        available: true,
        featured: false,
    }
}

pub fn booking(id: &str, car: Vehicle, status: BookingStatus, total: f64, created_day: u32) -> Booking {
    Booking {
        id: id.to_string(),
        car: VehicleRef::Populated(Box::new(car)),
        user: None,
        start_date: date(2024, 2, 1),
        end_date: date(2024, 2, 4),
        pickup_location: None,
        dropoff_location: None,
        additional_services: Vec::new(),
        payment_method: PaymentMethod::CreditCard,
        special_requests: None,
        status,
        total_price: total,
        total_days: Some(3),
        created_at: Some(date(2024, 1, created_day)),
    }
}

pub fn profile(id: &str, first: &str, last: &str, email: &str) -> Profile {
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "firstName": first,
        "lastName": last,
        "email": email,
        "phone": "555-0100",
    }))
    .unwrap()
}

#[derive(Default)]
struct State {
    cars: Vec<Vehicle>,
    similar: Vec<Vehicle>,
    reviews: Vec<Review>,
    availability: Option<bool>,
    bookings: Vec<Booking>,
    admin_bookings: Vec<Booking>,
    profile: Option<Profile>,
    users: Vec<Profile>,
    failures: HashMap<&'static str, (StatusCode, Option<String>)>,
    calls: HashMap<&'static str, usize>,
    delays: HashMap<&'static str, Duration>,
    created: Vec<CreateBookingRequest>,
    status_updates: Vec<(String, BookingStatus)>,
    car_queries: Vec<CarQuery>,
    booking_queries: Vec<BookingListQuery>,
    profile_updates: Vec<ProfileUpdate>,
    saved_cars: Vec<(Option<String>, VehicleInput)>,
    deleted_cars: Vec<String>,
    uploads: Vec<Vec<UploadFile>>,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<State>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn with(self, f: impl FnOnce(&mut State)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn with_cars(self, cars: Vec<Vehicle>) -> Self {
        self.with(|s| s.cars = cars)
    }

    pub fn with_similar(self, cars: Vec<Vehicle>) -> Self {
        self.with(|s| s.similar = cars)
    }

    pub fn with_reviews(self, reviews: Vec<Review>) -> Self {
        self.with(|s| s.reviews = reviews)
    }

    /// `None` makes the availability endpoint fail
    pub fn with_availability(self, available: Option<bool>) -> Self {
        self.with(|s| s.availability = available)
    }

    pub fn with_bookings(self, bookings: Vec<Booking>) -> Self {
        self.with(|s| s.bookings = bookings)
    }

    pub fn with_admin_bookings(self, bookings: Vec<Booking>) -> Self {
        self.with(|s| s.admin_bookings = bookings)
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        self.with(|s| s.profile = Some(profile))
    }

    pub fn with_users(self, users: Vec<Profile>) -> Self {
        self.with(|s| s.users = users)
    }

    /// Make `endpoint` fail with a 500 carrying `message`
    pub fn fail(&self, endpoint: &'static str, message: Option<&str>) {
        self.fail_with(endpoint, StatusCode::INTERNAL_SERVER_ERROR, message);
    }

    pub fn fail_with(&self, endpoint: &'static str, status: StatusCode, message: Option<&str>) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(endpoint, (status, message.map(str::to_string)));
    }

    /// Hold `endpoint` for `delay` before it answers
    pub fn delay(&self, endpoint: &'static str, delay: Duration) {
        self.state.lock().unwrap().delays.insert(endpoint, delay);
    }

    pub fn recover(&self, endpoint: &'static str) {
        self.state.lock().unwrap().failures.remove(endpoint);
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.state.lock().unwrap().calls.get(endpoint).copied().unwrap_or(0)
    }

    pub fn created(&self) -> Vec<CreateBookingRequest> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn status_updates(&self) -> Vec<(String, BookingStatus)> {
        self.state.lock().unwrap().status_updates.clone()
    }

    pub fn car_queries(&self) -> Vec<CarQuery> {
        self.state.lock().unwrap().car_queries.clone()
    }

    pub fn booking_queries(&self) -> Vec<BookingListQuery> {
        self.state.lock().unwrap().booking_queries.clone()
    }

    pub fn profile_updates(&self) -> Vec<ProfileUpdate> {
        self.state.lock().unwrap().profile_updates.clone()
    }

    pub fn saved_cars(&self) -> Vec<(Option<String>, VehicleInput)> {
        self.state.lock().unwrap().saved_cars.clone()
    }

    pub fn deleted_cars(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted_cars.clone()
    }

    pub fn uploads(&self) -> usize {
        self.state.lock().unwrap().uploads.len()
    }

    async fn pause(&self, endpoint: &'static str) {
        let delay = self.state.lock().unwrap().delays.get(endpoint).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// Count the call and return the configured failure, if any
    fn enter(&self, endpoint: &'static str) -> ClientResult<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(endpoint).or_default() += 1;
        if let Some((status, message)) = state.failures.get(endpoint) {
            return Err(ClientError::from_status(*status, message.clone()));
        }
        Ok(state)
    }
}

fn vehicle_from_input(id: String, input: &VehicleInput) -> Vehicle {
    let mut v = vehicle(&id, &input.make, &input.model, input.price_per_day, input.discount);
    v.year = input.year;
    v.images = input.images.clone();
    v.location = Some(VehicleLocation::Named(input.location.clone()));
    v.available = input.available;
    v.featured = input.featured;
    v
}

#[async_trait]
impl RentalApi for FakeApi {
    async fn list_cars(&self, query: &CarQuery) -> ClientResult<CarListResponse> {
        self.pause("list_cars").await;
        let mut state = self.enter("list_cars")?;
        state.car_queries.push(query.clone());
        let mut cars: Vec<Vehicle> = state
            .cars
            .iter()
            .filter(|c| query.featured != Some(true) || c.featured)
            .cloned()
            .collect();
        if let Some(limit) = query.limit {
            cars.truncate(limit as usize);
        }
        Ok(CarListResponse {
            total: Some(cars.len() as u64),
            cars,
            page: None,
            pages: None,
        })
    }

    async fn get_car(&self, id: &str) -> ClientResult<Vehicle> {
        self.pause("get_car").await;
        let state = self.enter("get_car")?;
        state
            .cars
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(Some("Car not found".into())))
    }

    async fn similar_cars(&self, _id: &str) -> ClientResult<Vec<Vehicle>> {
        Ok(self.enter("similar_cars")?.similar.clone())
    }

    async fn car_reviews(&self, _id: &str) -> ClientResult<Vec<Review>> {
        Ok(self.enter("car_reviews")?.reviews.clone())
    }

    async fn check_availability(&self, _id: &str, _query: AvailabilityQuery) -> ClientResult<AvailabilityResponse> {
        let state = self.enter("check_availability")?;
        state
            .availability
            .map(|available| AvailabilityResponse { available })
            .ok_or_else(|| ClientError::from_status(StatusCode::SERVICE_UNAVAILABLE, None))
    }

    async fn create_booking(&self, request: &CreateBookingRequest) -> ClientResult<Booking> {
        self.pause("create_booking").await;
        let mut state = self.enter("create_booking")?;
        state.created.push(request.clone());
        let car = state
            .cars
            .iter()
            .find(|c| c.id == request.car)
            .cloned()
            .map(|c| VehicleRef::Populated(Box::new(c)))
            .unwrap_or_else(|| VehicleRef::Id(request.car.clone()));
        let booking = Booking {
            id: format!("b{}", state.created.len()),
            car,
            user: None,
            start_date: request.start_date,
            end_date: request.end_date,
            pickup_location: Some(request.pickup_location.clone()),
            dropoff_location: Some(request.dropoff_location.clone()),
            additional_services: request.additional_services.clone(),
            payment_method: request.payment_method,
            special_requests: Some(request.special_requests.clone()),
            status: BookingStatus::Pending,
            total_price: 0.0,
            total_days: None,
            created_at: None,
        };
        state.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn my_bookings(&self, query: BookingListQuery) -> ClientResult<Vec<Booking>> {
        let mut state = self.enter("my_bookings")?;
        state.booking_queries.push(query);
        let mut bookings = state.bookings.clone();
        if let Some(limit) = query.limit {
            bookings.truncate(limit as usize);
        }
        Ok(bookings)
    }

    async fn cancel_booking(&self, id: &str) -> ClientResult<()> {
        let mut state = self.enter("cancel_booking")?;
        state.status_updates.push((id.to_string(), BookingStatus::Cancelled));
        Ok(())
    }

    async fn get_profile(&self) -> ClientResult<Profile> {
        let state = self.enter("get_profile")?;
        state
            .profile
            .clone()
            .ok_or(ClientError::Unauthorized(None))
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<Profile> {
        let mut state = self.enter("update_profile")?;
        state.profile_updates.push(update.clone());
        let profile = state.profile.as_mut().ok_or(ClientError::Unauthorized(None))?;
        profile.first_name = update.first_name.clone();
        profile.last_name = update.last_name.clone();
        profile.phone = update.phone.clone();
        profile.address = update.address.clone();
        profile.driver_license = update.driver_license.clone();
        Ok(profile.clone())
    }

    async fn admin_cars(&self) -> ClientResult<Vec<Vehicle>> {
        Ok(self.enter("admin_cars")?.cars.clone())
    }

    async fn create_car(&self, input: &VehicleInput) -> ClientResult<Vehicle> {
        let mut state = self.enter("create_car")?;
        state.saved_cars.push((None, input.clone()));
        let created = vehicle_from_input(format!("new{}", state.cars.len() + 1), input);
        state.cars.push(created.clone());
        Ok(created)
    }

    async fn update_car(&self, id: &str, input: &VehicleInput) -> ClientResult<Vehicle> {
        let mut state = self.enter("update_car")?;
        state.saved_cars.push((Some(id.to_string()), input.clone()));
        let updated = vehicle_from_input(id.to_string(), input);
        let slot = state
            .cars
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ClientError::NotFound(None))?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_car(&self, id: &str) -> ClientResult<()> {
        let mut state = self.enter("delete_car")?;
        state.deleted_cars.push(id.to_string());
        state.cars.retain(|c| c.id != id);
        Ok(())
    }

    async fn admin_bookings(&self) -> ClientResult<Vec<Booking>> {
        Ok(self.enter("admin_bookings")?.admin_bookings.clone())
    }

    async fn set_booking_status(&self, id: &str, status: BookingStatus) -> ClientResult<()> {
        let mut state = self.enter("set_booking_status")?;
        state.status_updates.push((id.to_string(), status));
        Ok(())
    }

    async fn admin_users(&self) -> ClientResult<Vec<Profile>> {
        Ok(self.enter("admin_users")?.users.clone())
    }

    async fn upload_images(&self, files: Vec<UploadFile>) -> ClientResult<UploadResponse> {
        let mut state = self.enter("upload_images")?;
        let urls = files
            .iter()
            .map(|f| format!("/uploads/{}", f.file_name))
            .collect();
        state.uploads.push(files);
        Ok(UploadResponse { urls })
    }
}
