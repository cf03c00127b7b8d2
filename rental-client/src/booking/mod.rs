//! Checkout: form state and the three-step wizard

pub mod flow;
pub mod form;

pub use flow::{BookingFlow, BookingStep, BookingSummary};
pub use form::{AddressField, AddressKind, BookingForm, FormAction};
