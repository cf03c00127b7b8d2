//! Availability checker
//!
//! Gates the booking flow: a vehicle can only be booked after the API has
//! confirmed it is free for the selected range.

use crate::{ClientError, ClientResult, RentalApi};
use chrono::{DateTime, Utc};
use shared::error::{AppError, ErrorCode};
use shared::request::AvailabilityQuery;

pub const MSG_SELECT_DATES: &str = "Please select both start and end dates";
pub const MSG_CHECK_FAILED: &str = "Error checking availability";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityChecker {
    verdict: Option<bool>,
    checking: bool,
    error: Option<String>,
}

/// Reject missing or non-increasing ranges without touching the network
pub fn validate_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<AvailabilityQuery, AppError> {
    let (Some(start), Some(end)) = (start, end) else {
        return Err(AppError::required("dates", MSG_SELECT_DATES));
    };
    if end <= start {
        return Err(AppError::new(ErrorCode::BookingInvalidDates));
    }
    Ok(AvailabilityQuery { start, end })
}

impl AvailabilityChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last verdict returned by the API; `None` until a check succeeds
    pub fn verdict(&self) -> Option<bool> {
        self.verdict
    }

    pub fn is_available(&self) -> bool {
        self.verdict == Some(true)
    }

    pub fn is_checking(&self) -> bool {
        self.checking
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Forget the verdict (the date range changed)
    pub fn reset(&mut self) {
        self.verdict = None;
        self.error = None;
    }

    /// Ask the API whether `car_id` is free between `start` and `end`
    ///
    /// On failure the previous verdict is kept and the error is recorded.
    pub async fn check<A>(
        &mut self,
        api: &A,
        car_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> ClientResult<bool>
    where
        A: RentalApi + ?Sized,
    {
        let query = match validate_range(start, end) {
            Ok(query) => query,
            Err(e) => {
                self.error = Some(e.message.clone());
                return Err(e.into());
            }
        };

        self.checking = true;
        self.error = None;
        let result = api.check_availability(car_id, query).await;
        self.checking = false;

        match result {
            Ok(resp) => {
                tracing::info!(car_id, available = resp.available, "Availability checked");
                self.verdict = Some(resp.available);
                Ok(resp.available)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                tracing::warn!(car_id, error = %e, "Availability check failed");
                self.error = Some(MSG_CHECK_FAILED.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, date};

    #[tokio::test]
    async fn test_rejects_bad_range_without_network() {
        let api = FakeApi::new().with_availability(Some(true));
        let mut checker = AvailabilityChecker::new();

        let err = checker
            .check(&api, "c1", Some(date(2024, 1, 4)), Some(date(2024, 1, 4)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BookingInvalidDates);
        assert_eq!(checker.error(), Some("End date must be after start date"));

        let err = checker
            .check(&api, "c1", None, Some(date(2024, 1, 4)))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(""), MSG_SELECT_DATES);

        assert_eq!(api.calls("check_availability"), 0);
        assert_eq!(checker.verdict(), None);
    }

    #[tokio::test]
    async fn test_records_verdict() {
        let api = FakeApi::new().with_availability(Some(false));
        let mut checker = AvailabilityChecker::new();

        let available = checker
            .check(&api, "c1", Some(date(2024, 1, 1)), Some(date(2024, 1, 4)))
            .await
            .unwrap();
        assert!(!available);
        assert_eq!(checker.verdict(), Some(false));
        assert!(!checker.is_available());
        assert_eq!(api.calls("check_availability"), 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_verdict() {
        let api = FakeApi::new().with_availability(Some(true));
        let mut checker = AvailabilityChecker::new();
        checker
            .check(&api, "c1", Some(date(2024, 1, 1)), Some(date(2024, 1, 4)))
            .await
            .unwrap();
        assert!(checker.is_available());

        api.fail("check_availability", None);
        let err = checker
            .check(&api, "c1", Some(date(2024, 1, 1)), Some(date(2024, 1, 5)))
            .await;
        assert!(err.is_err());
        assert_eq!(checker.error(), Some(MSG_CHECK_FAILED));
        assert_eq!(checker.verdict(), Some(true));
        assert!(!checker.is_checking());

        checker.reset();
        assert_eq!(checker.verdict(), None);
    }
}
