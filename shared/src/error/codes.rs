//! Unified error codes for the rental client
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Vehicle errors
//! - 4xxx: Booking errors
//! - 5xxx: Payment errors
//! - 6xxx: Profile errors
//! - 7xxx: Upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize as plain
/// JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 3xxx: Vehicle ====================
    /// Vehicle not found
    VehicleNotFound = 3001,
    /// Vehicle is not available for the requested dates
    VehicleUnavailable = 3002,
    /// Vehicle has an invalid daily price
    VehicleInvalidPrice = 3003,
    /// Vehicle discount outside 0..=100
    VehicleInvalidDiscount = 3004,

    // ==================== 4xxx: Booking ====================
    /// Booking not found
    BookingNotFound = 4001,
    /// End date is not after start date
    BookingInvalidDates = 4002,
    /// Status change not allowed from the current status
    BookingInvalidTransition = 4003,
    /// Booking was already cancelled
    BookingAlreadyCancelled = 4004,
    /// Booking was already completed
    BookingAlreadyCompleted = 4005,
    /// Booking could not be created
    BookingFailed = 4006,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed
    PaymentFailed = 5001,
    /// Invalid payment method
    PaymentInvalidMethod = 5003,

    // ==================== 6xxx: Profile ====================
    /// Email cannot be changed
    EmailImmutable = 6002,

    // ==================== 7xxx: Upload ====================
    /// File too large
    FileTooLarge = 7001,
    /// No file provided in request
    NoFileProvided = 7004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Vehicle
            ErrorCode::VehicleNotFound => "Car not found",
            ErrorCode::VehicleUnavailable => "Car is not available for the selected dates",
            ErrorCode::VehicleInvalidPrice => "Car has an invalid daily price",
            ErrorCode::VehicleInvalidDiscount => "Discount must be between 0 and 100",

            // Booking
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::BookingInvalidDates => "End date must be after start date",
            ErrorCode::BookingInvalidTransition => "Booking status change is not allowed",
            ErrorCode::BookingAlreadyCancelled => "Booking has already been cancelled",
            ErrorCode::BookingAlreadyCompleted => "Booking has already been completed",
            ErrorCode::BookingFailed => "Failed to create booking",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",

            // Profile
            ErrorCode::EmailImmutable => "Email cannot be changed",

            // Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::NoFileProvided => "No file provided",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Vehicle
            3001 => Ok(ErrorCode::VehicleNotFound),
            3002 => Ok(ErrorCode::VehicleUnavailable),
            3003 => Ok(ErrorCode::VehicleInvalidPrice),
            3004 => Ok(ErrorCode::VehicleInvalidDiscount),

            // Booking
            4001 => Ok(ErrorCode::BookingNotFound),
            4002 => Ok(ErrorCode::BookingInvalidDates),
            4003 => Ok(ErrorCode::BookingInvalidTransition),
            4004 => Ok(ErrorCode::BookingAlreadyCancelled),
            4005 => Ok(ErrorCode::BookingAlreadyCompleted),
            4006 => Ok(ErrorCode::BookingFailed),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5003 => Ok(ErrorCode::PaymentInvalidMethod),

            // Profile
            6002 => Ok(ErrorCode::EmailImmutable),

            // Upload
            7001 => Ok(ErrorCode::FileTooLarge),
            7004 => Ok(ErrorCode::NoFileProvided),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::VehicleNotFound.code(), 3001);
        assert_eq!(ErrorCode::BookingInvalidTransition.code(), 4003);
        assert_eq!(ErrorCode::PaymentFailed.code(), 5001);
        assert_eq!(ErrorCode::EmailImmutable.code(), 6002);
        assert_eq!(ErrorCode::NoFileProvided.code(), 7004);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_u16() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(3002), Ok(ErrorCode::VehicleUnavailable));
        assert_eq!(ErrorCode::try_from(4006), Ok(ErrorCode::BookingFailed));
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::BookingNotFound).unwrap();
        assert_eq!(json, "4001");

        let code: ErrorCode = serde_json::from_str("3002").unwrap();
        assert_eq!(code, ErrorCode::VehicleUnavailable);

        assert!(serde_json::from_str::<ErrorCode>("31337").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::BookingFailed), "4006");
        assert_eq!(format!("{}", InvalidErrorCode(999)), "invalid error code: 999");
    }

    #[test]
    fn test_messages() {
        assert_eq!(ErrorCode::BookingFailed.message(), "Failed to create booking");
        assert_eq!(
            ErrorCode::BookingInvalidDates.message(),
            "End date must be after start date"
        );
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
    }
}
