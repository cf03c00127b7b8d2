//! Vehicle detail page

use super::Route;
use crate::availability::AvailabilityChecker;
use crate::booking::BookingFlow;
use crate::task::{TaskSlot, guarded};
use crate::{ClientResult, RentalApi};
use chrono::{DateTime, Duration, Utc};
use shared::error::{AppError, ErrorCode};
use shared::models::{Review, Vehicle};
use shared::pricing::{base_estimate, rental_days};
use tokio_util::sync::CancellationToken;

pub const MSG_LOAD_DETAILS_FAILED: &str = "Failed to load car details";
pub const MSG_CHECK_FIRST: &str = "Please check availability first";

#[derive(Debug)]
pub struct DetailView {
    car_id: String,
    vehicle: TaskSlot<Vehicle>,
    similar: TaskSlot<Vec<Vehicle>>,
    reviews: TaskSlot<Vec<Review>>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    availability: AvailabilityChecker,
    active_image: usize,
    cancel: CancellationToken,
}

impl DetailView {
    /// Dates default to today through three days from now
    pub fn new(car_id: impl Into<String>) -> Self {
        let start = Utc::now();
        Self {
            car_id: car_id.into(),
            vehicle: TaskSlot::new(),
            similar: TaskSlot::new(),
            reviews: TaskSlot::new(),
            start: Some(start),
            end: Some(start + Duration::days(3)),
            availability: AvailabilityChecker::new(),
            active_image: 0,
            cancel: CancellationToken::new(),
        }
    }

    pub fn car_id(&self) -> &str {
        &self.car_id
    }

    /// Fetch detail, similar vehicles and reviews concurrently.
    /// Only the detail fetch can put the view in an error state.
    pub async fn load<A>(&mut self, api: &A)
    where
        A: RentalApi + ?Sized,
    {
        let tickets = (self.vehicle.begin(), self.similar.begin(), self.reviews.begin());
        let token = self.cancel.clone();
        let id = self.car_id.as_str();

        let (vehicle, similar, reviews) = tokio::join!(
            guarded(&token, api.get_car(id)),
            guarded(&token, api.similar_cars(id)),
            guarded(&token, api.car_reviews(id)),
        );

        let fallback = match &vehicle {
            Err(e) if e.is_not_found() => ErrorCode::VehicleNotFound.message(),
            _ => MSG_LOAD_DETAILS_FAILED,
        };
        if let Err(e) = &vehicle {
            tracing::warn!(car_id = %self.car_id, error = %e, "Error fetching car details");
        }
        if let Err(e) = &similar {
            tracing::warn!(car_id = %self.car_id, error = %e, "Error fetching similar cars");
        }
        if let Err(e) = &reviews {
            tracing::warn!(car_id = %self.car_id, error = %e, "Error fetching reviews");
        }

        self.vehicle.finish_with(tickets.0, vehicle, fallback);
        // Secondary lists fall back to empty on failure
        self.similar.finish_with(tickets.1, similar.or_else(ignore), "");
        self.reviews.finish_with(tickets.2, reviews.or_else(ignore), "");
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        self.vehicle.value()
    }

    pub fn is_loading(&self) -> bool {
        self.vehicle.is_loading()
    }

    /// Error or not-found message; the UI shows it with a route back to the catalog
    pub fn error(&self) -> Option<&str> {
        self.vehicle.error()
    }

    pub fn exit_route(&self) -> Option<Route> {
        self.error().map(|_| Route::Catalog)
    }

    pub fn similar(&self) -> &[Vehicle] {
        self.similar.value().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn reviews(&self) -> &[Review] {
        self.reviews.value().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn active_image(&self) -> Option<&str> {
        self.vehicle()
            .and_then(|v| v.images.get(self.active_image))
            .map(String::as_str)
    }

    pub fn select_image(&mut self, index: usize) {
        let count = self.vehicle().map(|v| v.images.len()).unwrap_or(0);
        if index < count {
            self.active_image = index;
        }
    }

    pub fn dates(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (self.start, self.end)
    }

    /// Change the range; any earlier verdict no longer applies
    pub fn set_dates(&mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) {
        if (start, end) != (self.start, self.end) {
            self.availability.reset();
        }
        self.start = start;
        self.end = end;
    }

    pub fn availability(&self) -> &AvailabilityChecker {
        &self.availability
    }

    pub async fn check_availability<A>(&mut self, api: &A) -> ClientResult<bool>
    where
        A: RentalApi + ?Sized,
    {
        let token = self.cancel.clone();
        guarded(
            &token,
            self.availability.check(api, &self.car_id, self.start, self.end),
        )
        .await
    }

    pub fn rental_days(&self) -> Option<u32> {
        Some(rental_days(self.start?, self.end?))
    }

    /// Rate × days, before add-ons and discount
    pub fn estimate(&self) -> f64 {
        match (self.vehicle(), self.start, self.end) {
            (Some(v), Some(start), Some(end)) => base_estimate(v.price_per_day, start, end),
            _ => 0.0,
        }
    }

    /// Hand the vehicle and dates to a new checkout
    ///
    /// Requires a positive availability verdict for the current range.
    pub fn begin_booking(&self) -> Result<BookingFlow, AppError> {
        match self.availability.verdict() {
            Some(true) => {}
            Some(false) => return Err(AppError::new(ErrorCode::VehicleUnavailable)),
            None => return Err(AppError::validation(MSG_CHECK_FIRST)),
        }
        let (Some(vehicle), Some(start), Some(end)) = (self.vehicle(), self.start, self.end) else {
            return Err(AppError::validation(MSG_CHECK_FIRST));
        };
        tracing::info!(car_id = %self.car_id, "Starting booking");
        Ok(BookingFlow::with_vehicle(vehicle.clone(), start, end))
    }

    pub fn booking_route(&self) -> Route {
        Route::Booking(self.car_id.clone())
    }

    /// Token another task can cancel to tear the view down mid-request
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn teardown(&mut self) {
        self.cancel.cancel();
        self.vehicle.invalidate();
        self.similar.invalidate();
        self.reviews.invalidate();
    }
}

impl Drop for DetailView {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn ignore<T: Default>(e: crate::ClientError) -> ClientResult<T> {
    match e {
        crate::ClientError::Cancelled => Err(e),
        _ => Ok(T::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingStep;
    use crate::testing::{FakeApi, date, vehicle};

    fn camry() -> Vehicle {
        let mut v = vehicle("c1", "Toyota", "Camry", 50.0, 10.0);
        v.images = vec!["/a.jpg".into(), "/b.jpg".into()];
        v
    }

    #[tokio::test]
    async fn test_load_all_three() {
        let api = FakeApi::new()
            .with_cars(vec![camry()])
            .with_similar(vec![vehicle("c2", "Honda", "Accord", 55.0, 0.0)]);
        let mut view = DetailView::new("c1");
        view.load(&api).await;

        assert_eq!(view.vehicle().unwrap().model, "Camry");
        assert_eq!(view.similar().len(), 1);
        assert!(view.reviews().is_empty());
        assert!(view.error().is_none());
        assert_eq!(api.calls("get_car"), 1);
        assert_eq!(api.calls("similar_cars"), 1);
        assert_eq!(api.calls("car_reviews"), 1);
    }

    #[tokio::test]
    async fn test_secondary_failures_are_not_fatal() {
        let api = FakeApi::new().with_cars(vec![camry()]);
        api.fail("similar_cars", None);
        api.fail("car_reviews", Some("boom"));
        let mut view = DetailView::new("c1");
        view.load(&api).await;

        assert!(view.vehicle().is_some());
        assert!(view.error().is_none());
        assert!(view.similar().is_empty());
        assert!(view.reviews().is_empty());
    }

    #[tokio::test]
    async fn test_not_found() {
        let api = FakeApi::new();
        let mut view = DetailView::new("missing");
        view.load(&api).await;
        assert_eq!(view.error(), Some("Car not found"));
        assert_eq!(view.exit_route(), Some(Route::Catalog));

        api.fail("get_car", None);
        view.load(&api).await;
        assert_eq!(view.error(), Some(MSG_LOAD_DETAILS_FAILED));
    }

    #[tokio::test]
    async fn test_begin_booking_requires_verdict() {
        let api = FakeApi::new().with_cars(vec![camry()]).with_availability(Some(true));
        let mut view = DetailView::new("c1");
        view.load(&api).await;
        view.set_dates(Some(date(2024, 1, 1)), Some(date(2024, 1, 4)));

        assert_eq!(view.begin_booking().unwrap_err().message, MSG_CHECK_FIRST);
        assert_eq!(view.estimate(), 150.0);
        assert_eq!(view.rental_days(), Some(3));

        assert!(view.check_availability(&api).await.unwrap());
        let flow = view.begin_booking().unwrap();
        assert_eq!(flow.step(), &BookingStep::Details);
        assert_eq!(flow.dates(), (date(2024, 1, 1), date(2024, 1, 4)));
        assert_eq!(flow.quote().total, 135.0);

        view.set_dates(Some(date(2024, 1, 1)), Some(date(2024, 1, 5)));
        assert!(view.begin_booking().is_err());
    }

    #[tokio::test]
    async fn test_unavailable_blocks_booking() {
        let api = FakeApi::new().with_cars(vec![camry()]).with_availability(Some(false));
        let mut view = DetailView::new("c1");
        view.load(&api).await;
        assert!(!view.check_availability(&api).await.unwrap());
        let err = view.begin_booking().unwrap_err();
        assert_eq!(err.code, ErrorCode::VehicleUnavailable);
        assert_eq!(err.message, "Car is not available for the selected dates");
    }

    #[tokio::test]
    async fn test_select_image() {
        let api = FakeApi::new().with_cars(vec![camry()]);
        let mut view = DetailView::new("c1");
        view.load(&api).await;
        assert_eq!(view.active_image(), Some("/a.jpg"));
        view.select_image(1);
        assert_eq!(view.active_image(), Some("/b.jpg"));
        view.select_image(9);
        assert_eq!(view.active_image(), Some("/b.jpg"));
    }
}
