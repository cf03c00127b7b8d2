//! Price Calculator
//!
//! Duration, add-on cost and discount-adjusted totals for a rental.
//! Uses rust_decimal for precise calculations, returns f64.

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::{AddOnSelection, Vehicle};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Monetary values are rounded to 2 decimal places, half away from zero
const DECIMAL_PLACES: u32 = 2;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Maximum accepted daily price for a vehicle or add-on
pub const MAX_DAILY_PRICE: f64 = 1_000_000.0;

/// Daily price as Decimal, or `None` when non-finite, negative or above the ceiling
fn daily_price(value: f64) -> Option<Decimal> {
    if !value.is_finite() || !(0.0..=MAX_DAILY_PRICE).contains(&value) {
        return None;
    }
    Decimal::from_f64(value)
}

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Number of billable days between two instants
///
/// Partial days round up; a zero-length range still bills one day.
pub fn rental_days(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let millis = (end - start).num_milliseconds().unsigned_abs();
    let days = millis.div_ceil(MILLIS_PER_DAY as u64);
    u32::try_from(days).unwrap_or(u32::MAX).max(1)
}

/// Calculator input
#[derive(Debug, Clone, Default)]
pub struct PriceInput<'a> {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Daily rate; `None` while the vehicle is not loaded
    pub daily_rate: Option<f64>,
    pub add_ons: &'a [AddOnSelection],
    /// Discount percentage; `None` or non-positive means no discount
    pub discount: Option<f64>,
}

/// Price breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub days: u32,
    /// daily rate × days
    pub base_cost: f64,
    /// Σ add-on prices × days
    pub add_on_cost: f64,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub total: f64,
}

impl PriceQuote {
    pub fn is_zero(&self) -> bool {
        self.total == 0.0 && self.subtotal == 0.0
    }
}

/// Compute the full price breakdown
///
/// Returns a zero quote when the rate or either date is missing, or when a
/// price is out of range.
pub fn quote(input: &PriceInput<'_>) -> PriceQuote {
    try_quote(input).unwrap_or_default()
}

/// Compute the full price breakdown, rejecting out-of-range prices
///
/// A missing rate or date still yields a zero quote.
pub fn try_quote(input: &PriceInput<'_>) -> AppResult<PriceQuote> {
    let (Some(rate), Some(start), Some(end)) = (input.daily_rate, input.start, input.end) else {
        return Ok(PriceQuote::default());
    };
    let invalid_price = || AppError::new(ErrorCode::VehicleInvalidPrice);

    let days = rental_days(start, end);
    let days_dec = Decimal::from(days);

    let rate = daily_price(rate).ok_or_else(invalid_price)?;
    let add_on_daily = input.add_ons.iter().try_fold(Decimal::ZERO, |acc, a| {
        daily_price(a.price).and_then(|p| acc.checked_add(p))
    });
    let add_on_daily = add_on_daily.ok_or_else(invalid_price)?;

    let discount_pct = match input.discount {
        Some(d) if !d.is_finite() => return Err(AppError::new(ErrorCode::VehicleInvalidDiscount)),
        Some(d) if d > 0.0 => to_decimal(d.min(100.0)),
        _ => Decimal::ZERO,
    };

    let base_cost = rate.checked_mul(days_dec).ok_or_else(invalid_price)?;
    let add_on_cost = add_on_daily.checked_mul(days_dec).ok_or_else(invalid_price)?;
    let subtotal = base_cost.checked_add(add_on_cost).ok_or_else(invalid_price)?;
    let discount_amount = subtotal
        .checked_mul(discount_pct)
        .map(|d| d / Decimal::ONE_HUNDRED)
        .ok_or_else(invalid_price)?;
    let total = subtotal - discount_amount;

    Ok(PriceQuote {
        days,
        base_cost: to_f64(base_cost),
        add_on_cost: to_f64(add_on_cost),
        subtotal: to_f64(subtotal),
        discount_amount: to_f64(discount_amount),
        total: to_f64(total),
    })
}

/// Quote a rental of a loaded vehicle
pub fn quote_for_vehicle(
    vehicle: Option<&Vehicle>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    add_ons: &[AddOnSelection],
) -> PriceQuote {
    quote(&PriceInput {
        start,
        end,
        daily_rate: vehicle.map(|v| v.price_per_day),
        add_ons,
        discount: vehicle.map(|v| v.discount),
    })
}

/// Detail page estimate: rate × days, no add-ons or discount
///
/// Zero when the rate is out of range.
pub fn base_estimate(daily_rate: f64, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    daily_price(daily_rate)
        .and_then(|rate| rate.checked_mul(Decimal::from(rental_days(start, end))))
        .map(to_f64)
        .unwrap_or_default()
}

/// Sum monetary amounts without float drift
pub fn sum_amounts(amounts: impl IntoIterator<Item = f64>) -> f64 {
    let total = amounts
        .into_iter()
        .map(to_decimal)
        .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(a));
    total.map(to_f64).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_rental_days() {
        assert_eq!(rental_days(day(1), day(4)), 3);
        assert_eq!(rental_days(day(4), day(1)), 3);
        assert_eq!(rental_days(day(1), day(1)), 1);

        let start = day(1);
        let end = start + chrono::Duration::hours(25);
        assert_eq!(rental_days(start, end), 2);
    }

    #[test]
    fn test_quote_with_add_on_and_discount() {
        let add_ons = vec![AddOnSelection {
            name: "Child Seat".into(),
            price: 10.0,
        }];
        let q = quote(&PriceInput {
            start: Some(day(1)),
            end: Some(day(4)),
            daily_rate: Some(50.0),
            add_ons: &add_ons,
            discount: Some(10.0),
        });
        assert_eq!(q.days, 3);
        assert_eq!(q.base_cost, 150.0);
        assert_eq!(q.add_on_cost, 30.0);
        assert_eq!(q.subtotal, 180.0);
        assert_eq!(q.discount_amount, 18.0);
        assert_eq!(q.total, 162.0);
    }

    #[test]
    fn test_quote_without_discount() {
        for discount in [None, Some(0.0), Some(-5.0)] {
            let q = quote(&PriceInput {
                start: Some(day(1)),
                end: Some(day(3)),
                daily_rate: Some(45.5),
                add_ons: &[],
                discount,
            });
            assert_eq!(q.subtotal, 91.0);
            assert_eq!(q.total, q.subtotal);
            assert_eq!(q.discount_amount, 0.0);
        }
    }

    #[test]
    fn test_quote_missing_rate_is_zero() {
        let q = quote(&PriceInput {
            start: Some(day(1)),
            end: Some(day(4)),
            daily_rate: None,
            ..Default::default()
        });
        assert!(q.is_zero());
        assert_eq!(q.days, 0);

        let q = quote_for_vehicle(None, Some(day(1)), Some(day(2)), &[]);
        assert!(q.is_zero());
    }

    #[test]
    fn test_quote_rounding() {
        let q = quote(&PriceInput {
            start: Some(day(1)),
            end: Some(day(2)),
            daily_rate: Some(33.33),
            add_ons: &[],
            discount: Some(15.0),
        });
        // 33.33 * 0.85 = 28.3305
        assert_eq!(q.total, 28.33);
        assert_eq!(q.discount_amount, 5.0);
    }

    #[test]
    fn test_discount_clamped() {
        let q = quote(&PriceInput {
            start: Some(day(1)),
            end: Some(day(2)),
            daily_rate: Some(80.0),
            add_ons: &[],
            discount: Some(150.0),
        });
        assert_eq!(q.total, 0.0);
    }

    #[test]
    fn test_base_estimate() {
        assert_eq!(base_estimate(50.0, day(1), day(4)), 150.0);
        assert_eq!(base_estimate(19.99, day(1), day(1)), 19.99);
    }

    #[test]
    fn test_extreme_prices_do_not_overflow() {
        let far = Utc.with_ymd_and_hms(2054, 1, 1, 0, 0, 0).unwrap();
        let input = PriceInput {
            start: Some(day(1)),
            end: Some(far),
            daily_rate: Some(1e25),
            add_ons: &[],
            discount: None,
        };
        let err = try_quote(&input).unwrap_err();
        assert_eq!(err.code, ErrorCode::VehicleInvalidPrice);
        assert!(quote(&input).is_zero());
        assert_eq!(base_estimate(1e25, day(1), far), 0.0);

        let add_ons = vec![AddOnSelection {
            name: "Gold plating".into(),
            price: f64::INFINITY,
        }];
        let err = try_quote(&PriceInput {
            daily_rate: Some(50.0),
            add_ons: &add_ons,
            ..input.clone()
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::VehicleInvalidPrice);

        let err = try_quote(&PriceInput {
            daily_rate: Some(50.0),
            discount: Some(f64::NAN),
            ..input.clone()
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::VehicleInvalidDiscount);

        // Ceiling price over thirty years still fits
        let q = quote(&PriceInput {
            daily_rate: Some(MAX_DAILY_PRICE),
            ..input
        });
        assert_eq!(q.days, 10958);
        assert_eq!(q.total, 10_958_000_000.0);
    }

    #[test]
    fn test_sum_amounts() {
        assert_eq!(sum_amounts([0.1, 0.2]), 0.3);
        assert_eq!(sum_amounts([19.99, 5.01, 75.0]), 100.0);
        assert_eq!(sum_amounts([]), 0.0);
    }
}
