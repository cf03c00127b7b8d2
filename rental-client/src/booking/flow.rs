//! Booking wizard
//!
//! ```text
//! Details ──next──► Payment ──submit ok──► Confirmation ──finish──► my bookings
//!    ▲                 │
//!    └──────back───────┘   (submit error stays at Payment)
//! ```

use super::form::{BookingForm, FormAction};
use crate::task::{TaskSlot, guarded};
use crate::views::Route;
use crate::{ClientError, ClientResult, RentalApi};
use chrono::{DateTime, Duration, Utc};
use shared::error::{AppError, ErrorCode};
use shared::models::{PaymentMethod, Vehicle};
use shared::pricing::{PriceInput, PriceQuote, quote_for_vehicle, try_quote};
use tokio_util::sync::CancellationToken;

pub const MSG_BOOKING_FAILED: &str = ErrorCode::BookingFailed.message();
pub const MSG_LOAD_CAR_FAILED: &str = "Failed to load car details";

/// What the customer sees after a successful booking
#[derive(Debug, Clone, PartialEq)]
pub struct BookingSummary {
    pub booking_id: String,
    pub car_id: String,
    pub vehicle_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub quote: PriceQuote,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingStep {
    Details,
    Payment,
    Confirmation(BookingSummary),
}

impl BookingStep {
    pub fn number(&self) -> u8 {
        match self {
            Self::Details => 1,
            Self::Payment => 2,
            Self::Confirmation(_) => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Details => "Booking Details",
            Self::Payment => "Payment",
            Self::Confirmation(_) => "Confirmation",
        }
    }
}

/// Checkout state for one vehicle and date range
#[derive(Debug)]
pub struct BookingFlow {
    car_id: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: BookingStep,
    form: BookingForm,
    vehicle: TaskSlot<Vehicle>,
    submitting: bool,
    error: Option<String>,
    cancel: CancellationToken,
}

impl BookingFlow {
    /// Start a checkout without the vehicle; call [`BookingFlow::load`] next
    pub fn new(car_id: impl Into<String>, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        let start = start.unwrap_or_else(Utc::now);
        let end = end.unwrap_or(start + Duration::days(3));
        Self {
            car_id: car_id.into(),
            start,
            end,
            step: BookingStep::Details,
            form: BookingForm::default(),
            vehicle: TaskSlot::new(),
            submitting: false,
            error: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Start a checkout with a vehicle already on hand (from the detail page)
    pub fn with_vehicle(vehicle: Vehicle, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let mut flow = Self::new(vehicle.id.clone(), Some(start), Some(end));
        flow.vehicle.set(vehicle);
        flow
    }

    /// Fetch the vehicle when missing and prefill contact details for a
    /// signed-in customer. Both requests run concurrently.
    pub async fn load<A>(&mut self, api: &A, signed_in: bool)
    where
        A: RentalApi + ?Sized,
    {
        let need_vehicle = self.vehicle.value().is_none();
        let ticket = need_vehicle.then(|| self.vehicle.begin());
        let token = self.cancel.clone();
        let car_id = self.car_id.clone();

        let (vehicle, profile) = tokio::join!(
            async {
                match need_vehicle {
                    true => Some(guarded(&token, api.get_car(&car_id)).await),
                    false => None,
                }
            },
            async {
                match signed_in {
                    true => Some(guarded(&token, api.get_profile()).await),
                    false => None,
                }
            }
        );

        if let (Some(ticket), Some(result)) = (ticket, vehicle) {
            let fallback = match &result {
                Err(e) if e.is_not_found() => ErrorCode::VehicleNotFound.message(),
                _ => MSG_LOAD_CAR_FAILED,
            };
            if let Err(e) = &result {
                tracing::warn!(car_id = %self.car_id, error = %e, "Failed to load vehicle for booking");
            }
            self.vehicle.finish_with(ticket, result, fallback);
        }

        match profile {
            Some(Ok(profile)) => self.form = self.form.clone().apply(FormAction::prefill_from(&profile)),
            Some(Err(e)) if !e.is_cancelled() => {
                tracing::warn!(error = %e, "Could not prefill booking form from profile");
            }
            _ => {}
        }
    }

    pub fn step(&self) -> &BookingStep {
        &self.step
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        self.vehicle.value()
    }

    /// Vehicle load error (not found or failure); the UI offers a way back to the catalog
    pub fn load_error(&self) -> Option<&str> {
        self.vehicle.error()
    }

    pub fn is_loading(&self) -> bool {
        self.vehicle.is_loading()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dates(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    /// Live price for the current selections
    pub fn quote(&self) -> PriceQuote {
        quote_for_vehicle(self.vehicle.value(), Some(self.start), Some(self.end), &self.form.add_ons)
    }

    /// Edit the form. Ignored once the booking is confirmed.
    pub fn dispatch(&mut self, action: FormAction) {
        if matches!(self.step, BookingStep::Confirmation(_)) {
            return;
        }
        self.form = self.form.clone().apply(action);
    }

    /// Details → Payment
    pub fn next(&mut self) -> Result<(), AppError> {
        if self.step != BookingStep::Details {
            return Err(AppError::invalid_request("Booking details are already complete"));
        }
        if let Err(e) = self.form.validate_details() {
            self.error = Some(e.message.clone());
            return Err(e);
        }
        self.error = None;
        self.step = BookingStep::Payment;
        tracing::info!(car_id = %self.car_id, "Booking details accepted");
        Ok(())
    }

    /// Payment → Details, keeping everything entered
    pub fn back(&mut self) {
        if self.step == BookingStep::Payment {
            self.step = BookingStep::Details;
            self.error = None;
        }
    }

    /// Payment → Confirmation. On failure the flow stays at Payment.
    pub async fn submit<A>(&mut self, api: &A) -> ClientResult<&BookingSummary>
    where
        A: RentalApi + ?Sized,
    {
        if self.step != BookingStep::Payment {
            return Err(AppError::invalid_request("Complete the booking details first").into());
        }
        self.form.validate_payment()?;
        if self.end <= self.start {
            return Err(AppError::new(ErrorCode::BookingInvalidDates).into());
        }
        let Some(vehicle) = self.vehicle.value() else {
            return Err(AppError::new(ErrorCode::VehicleNotFound).into());
        };

        let quote = try_quote(&PriceInput {
            start: Some(self.start),
            end: Some(self.end),
            daily_rate: Some(vehicle.price_per_day),
            add_ons: &self.form.add_ons,
            discount: Some(vehicle.discount),
        })?;
        let vehicle_name = vehicle.display_name();
        let request = self.form.to_request(&self.car_id, self.start, self.end);

        self.submitting = true;
        self.error = None;
        let result = guarded(&self.cancel, api.create_booking(&request)).await;
        self.submitting = false;

        match result {
            Ok(booking) => {
                tracing::info!(booking_id = %booking.id, car_id = %self.car_id, total = quote.total, "Booking created");
                self.step = BookingStep::Confirmation(BookingSummary {
                    booking_id: booking.id,
                    car_id: self.car_id.clone(),
                    vehicle_name,
                    start: self.start,
                    end: self.end,
                    payment_method: self.form.payment_method,
                    quote,
                });
                match &self.step {
                    BookingStep::Confirmation(summary) => Ok(summary),
                    _ => Err(ClientError::InvalidResponse("booking step changed".into())),
                }
            }
            Err(e) => {
                if !e.is_cancelled() {
                    tracing::warn!(car_id = %self.car_id, error = %e, "Booking submission failed");
                    self.error = Some(e.user_message(MSG_BOOKING_FAILED));
                }
                Err(e)
            }
        }
    }

    /// Confirmation → exit
    pub fn finish(&self) -> Option<Route> {
        match self.step {
            BookingStep::Confirmation(_) => Some(Route::MyBookings),
            _ => None,
        }
    }

    /// Where to go when the vehicle could not be loaded
    pub fn exit_route(&self) -> Option<Route> {
        self.load_error().map(|_| Route::Catalog)
    }

    /// Token another task can cancel to abandon an in-flight submission
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Tear the flow down; in-flight requests resolve as cancelled
    pub fn teardown(&mut self) {
        self.cancel.cancel();
        self.vehicle.invalidate();
    }
}

impl Drop for BookingFlow {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
