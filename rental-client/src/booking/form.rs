//! Booking form state
//!
//! [`BookingForm`] is a plain value; every edit goes through
//! [`BookingForm::apply`] which returns the next form. Validation is split
//! per wizard step and reports one message per field group.

use chrono::{DateTime, Utc};
use shared::error::AppError;
use shared::models::{
    AddOnSelection, AddOnService, Address, CreateBookingRequest, PaymentMethod, Profile,
};

pub const MSG_CONTACT_REQUIRED: &str = "Please fill in all required fields";
pub const MSG_PICKUP_REQUIRED: &str = "Please provide pickup location details";
pub const MSG_DROPOFF_REQUIRED: &str = "Please provide dropoff location details";
pub const MSG_BILLING_REQUIRED: &str = "Please provide billing address details";

/// Which address block an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Pickup,
    Dropoff,
    Billing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    Address,
    City,
    State,
    ZipCode,
}

/// A single form edit
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    FirstName(String),
    LastName(String),
    Email(String),
    Phone(String),
    Address(AddressKind, AddressField, String),
    SameDropoff(bool),
    SameBilling(bool),
    PaymentMethod(PaymentMethod),
    ToggleAddOn(&'static AddOnService, bool),
    SpecialRequests(String),
    /// Copy contact details from the signed-in customer's profile
    Prefill {
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
    },
}

impl FormAction {
    /// Build an edit from a field path such as `pickupLocation.city`
    pub fn from_path(path: &str, value: impl Into<String>) -> Result<Self, AppError> {
        let value = value.into();
        let action = match path {
            "firstName" => Self::FirstName(value),
            "lastName" => Self::LastName(value),
            "email" => Self::Email(value),
            "phone" => Self::Phone(value),
            "specialRequests" => Self::SpecialRequests(value),
            "paymentMethod" => Self::PaymentMethod(value.parse()?),
            "sameDropoff" => Self::SameDropoff(parse_flag(path, &value)?),
            "sameAsBilling" => Self::SameBilling(parse_flag(path, &value)?),
            _ => {
                let Some((parent, child)) = path.split_once('.') else {
                    return Err(unknown_field(path));
                };
                let kind = match parent {
                    "pickupLocation" => AddressKind::Pickup,
                    "dropoffLocation" => AddressKind::Dropoff,
                    "billingAddress" => AddressKind::Billing,
                    _ => return Err(unknown_field(path)),
                };
                let field = match child {
                    "address" => AddressField::Address,
                    "city" => AddressField::City,
                    "state" => AddressField::State,
                    "zipCode" => AddressField::ZipCode,
                    _ => return Err(unknown_field(path)),
                };
                Self::Address(kind, field, value)
            }
        };
        Ok(action)
    }

    pub fn prefill_from(profile: &Profile) -> Self {
        Self::Prefill {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
        }
    }
}

fn parse_flag(path: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(AppError::invalid_request(format!("{} expects true or false", path))),
    }
}

fn unknown_field(path: &str) -> AppError {
    AppError::invalid_request(format!("Unknown booking field: {}", path)).with_detail("field", path)
}

fn set_address_field(address: &mut Address, field: AddressField, value: String) {
    match field {
        AddressField::Address => address.address = value,
        AddressField::City => address.city = value,
        AddressField::State => address.state = value,
        AddressField::ZipCode => address.zip_code = value,
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub pickup: Address,
    pub dropoff: Address,
    pub same_dropoff: bool,
    pub billing: Address,
    pub same_billing: bool,
    pub payment_method: PaymentMethod,
    pub add_ons: Vec<AddOnSelection>,
    pub special_requests: String,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            pickup: Address::default(),
            dropoff: Address::default(),
            same_dropoff: true,
            billing: Address::default(),
            same_billing: true,
            payment_method: PaymentMethod::default(),
            add_ons: Vec::new(),
            special_requests: String::new(),
        }
    }
}

impl BookingForm {
    /// Apply one edit and return the next form
    pub fn apply(mut self, action: FormAction) -> Self {
        match action {
            FormAction::FirstName(v) => self.first_name = v,
            FormAction::LastName(v) => self.last_name = v,
            FormAction::Email(v) => self.email = v,
            FormAction::Phone(v) => self.phone = v,
            FormAction::Address(kind, field, value) => match kind {
                AddressKind::Pickup => {
                    set_address_field(&mut self.pickup, field, value);
                    if self.same_dropoff {
                        self.dropoff = self.pickup.clone();
                    }
                    if self.same_billing {
                        self.billing = self.pickup.clone();
                    }
                }
                AddressKind::Dropoff => set_address_field(&mut self.dropoff, field, value),
                AddressKind::Billing => set_address_field(&mut self.billing, field, value),
            },
            FormAction::SameDropoff(on) => {
                self.same_dropoff = on;
                if on {
                    self.dropoff = self.pickup.clone();
                }
            }
            FormAction::SameBilling(on) => {
                self.same_billing = on;
                if on {
                    self.billing = self.pickup.clone();
                }
            }
            FormAction::PaymentMethod(method) => self.payment_method = method,
            FormAction::ToggleAddOn(service, checked) => {
                if checked {
                    if !self.has_add_on(service) {
                        self.add_ons.push(service.to_selection());
                    }
                } else if let Some(i) = self.add_ons.iter().position(|a| a.name == service.name) {
                    self.add_ons.remove(i);
                }
            }
            FormAction::SpecialRequests(v) => self.special_requests = v,
            FormAction::Prefill {
                first_name,
                last_name,
                email,
                phone,
            } => {
                self.first_name = first_name;
                self.last_name = last_name;
                self.email = email;
                self.phone = phone;
            }
        }
        self
    }

    pub fn has_add_on(&self, service: &AddOnService) -> bool {
        self.add_ons.iter().any(|a| a.name == service.name)
    }

    /// Dropoff as it will be submitted
    pub fn effective_dropoff(&self) -> &Address {
        if self.same_dropoff { &self.pickup } else { &self.dropoff }
    }

    pub fn effective_billing(&self) -> &Address {
        if self.same_billing { &self.pickup } else { &self.billing }
    }

    /// Every failing field group of the details step, in display order
    pub fn details_errors(&self) -> Vec<AppError> {
        let mut errors = Vec::new();
        if [&self.first_name, &self.last_name, &self.email, &self.phone]
            .into_iter()
            .any(|v| blank(v))
        {
            errors.push(AppError::required("contact", MSG_CONTACT_REQUIRED));
        }
        if !self.pickup.is_complete() {
            errors.push(AppError::required("pickup", MSG_PICKUP_REQUIRED));
        }
        if !self.same_dropoff && !self.dropoff.is_complete() {
            errors.push(AppError::required("dropoff", MSG_DROPOFF_REQUIRED));
        }
        errors
    }

    /// First failing group of the details step
    pub fn validate_details(&self) -> Result<(), AppError> {
        match self.details_errors().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn validate_payment(&self) -> Result<(), AppError> {
        if !self.same_billing && !self.billing.is_complete() {
            return Err(AppError::required("billing", MSG_BILLING_REQUIRED));
        }
        Ok(())
    }

    /// Render the create-booking body
    pub fn to_request(&self, car_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> CreateBookingRequest {
        CreateBookingRequest {
            car: car_id.to_string(),
            start_date: start,
            end_date: end,
            pickup_location: self.pickup.clone(),
            dropoff_location: self.effective_dropoff().clone(),
            payment_method: self.payment_method,
            additional_services: self.add_ons.clone(),
            special_requests: self.special_requests.clone(),
        }
    }
}

/// Free-function form of [`BookingForm::apply`]
pub fn apply(form: BookingForm, action: FormAction) -> BookingForm {
    form.apply(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::date;
    use shared::error::ErrorCode;

    fn service(id: &str) -> &'static AddOnService {
        AddOnService::find(id).unwrap()
    }

    fn filled() -> BookingForm {
        [
            FormAction::FirstName("Ada".into()),
            FormAction::LastName("Lovelace".into()),
            FormAction::Email("ada@example.com".into()),
            FormAction::Phone("555-0101".into()),
            FormAction::Address(AddressKind::Pickup, AddressField::Address, "1 Main St".into()),
            FormAction::Address(AddressKind::Pickup, AddressField::City, "Austin".into()),
        ]
        .into_iter()
        .fold(BookingForm::default(), apply)
    }

    #[test]
    fn test_defaults() {
        let form = BookingForm::default();
        assert!(form.same_dropoff);
        assert!(form.same_billing);
        assert_eq!(form.payment_method, PaymentMethod::CreditCard);
        assert!(form.add_ons.is_empty());
    }

    #[test]
    fn test_dropoff_mirrors_pickup() {
        let form = filled();
        assert_eq!(form.dropoff, form.pickup);
        assert_eq!(form.billing, form.pickup);

        let form = form
            .apply(FormAction::SameDropoff(false))
            .apply(FormAction::Address(AddressKind::Pickup, AddressField::City, "Dallas".into()));
        assert_eq!(form.pickup.city, "Dallas");
        assert_eq!(form.dropoff.city, "Austin");

        let form = form.apply(FormAction::SameDropoff(true));
        assert_eq!(form.dropoff.city, "Dallas");
    }

    #[test]
    fn test_toggle_add_on() {
        let form = BookingForm::default()
            .apply(FormAction::ToggleAddOn(service("gps"), true))
            .apply(FormAction::ToggleAddOn(service("childSeat"), true))
            .apply(FormAction::ToggleAddOn(service("insurance"), true))
            .apply(FormAction::ToggleAddOn(service("gps"), true));
        assert_eq!(form.add_ons.len(), 3);

        let form = form.apply(FormAction::ToggleAddOn(service("childSeat"), false));
        let names: Vec<&str> = form.add_ons.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["GPS Navigation", "Full Insurance Coverage"]);
        assert_eq!(form.add_ons[0].price, 5.0);

        let mut form = form;
        form.add_ons.push(service("gps").to_selection());
        let form = form.apply(FormAction::ToggleAddOn(service("gps"), false));
        let names: Vec<&str> = form.add_ons.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Full Insurance Coverage", "GPS Navigation"]);
    }

    #[test]
    fn test_details_validation_groups() {
        let form = BookingForm::default();
        let errors = form.details_errors();
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec![MSG_CONTACT_REQUIRED, MSG_PICKUP_REQUIRED]);
        assert_eq!(errors[0].code, ErrorCode::RequiredField);

        let form = filled().apply(FormAction::Phone("  ".into()));
        assert_eq!(form.validate_details().unwrap_err().message, MSG_CONTACT_REQUIRED);

        let form = filled().apply(FormAction::SameDropoff(false)).apply(FormAction::Address(
            AddressKind::Dropoff,
            AddressField::Address,
            String::new(),
        ));
        assert_eq!(form.validate_details().unwrap_err().message, MSG_DROPOFF_REQUIRED);

        assert!(filled().validate_details().is_ok());
    }

    #[test]
    fn test_payment_validation() {
        let form = filled();
        assert!(form.validate_payment().is_ok());

        let form = form.apply(FormAction::SameBilling(false)).apply(FormAction::Address(
            AddressKind::Billing,
            AddressField::City,
            String::new(),
        ));
        assert_eq!(form.validate_payment().unwrap_err().message, MSG_BILLING_REQUIRED);
    }

    #[test]
    fn test_from_path() {
        let form = BookingForm::default()
            .apply(FormAction::from_path("pickupLocation.zipCode", "78701").unwrap())
            .apply(FormAction::from_path("paymentMethod", "paypal").unwrap())
            .apply(FormAction::from_path("sameDropoff", "no").unwrap());
        assert_eq!(form.pickup.zip_code, "78701");
        assert_eq!(form.payment_method, PaymentMethod::Paypal);
        assert!(!form.same_dropoff);

        assert!(FormAction::from_path("pickupLocation.country", "US").is_err());
        assert!(FormAction::from_path("nickname", "x").is_err());
        assert!(FormAction::from_path("sameAsBilling", "maybe").is_err());
    }

    #[test]
    fn test_prefill_from_profile() {
        let profile = crate::testing::profile("u1", "Grace", "Hopper", "grace@example.com");
        let form = BookingForm::default().apply(FormAction::prefill_from(&profile));
        assert_eq!(form.first_name, "Grace");
        assert_eq!(form.email, "grace@example.com");
        assert_eq!(form.phone, "555-0100");
    }

    #[test]
    fn test_to_request_uses_pickup_when_mirrored() {
        let form = filled()
            .apply(FormAction::SameDropoff(false))
            .apply(FormAction::Address(AddressKind::Dropoff, AddressField::City, "Houston".into()))
            .apply(FormAction::SameDropoff(true))
            .apply(FormAction::SpecialRequests("Late pickup".into()));
        let req = form.to_request("c1", date(2024, 1, 1), date(2024, 1, 4));
        assert_eq!(req.car, "c1");
        assert_eq!(req.dropoff_location, req.pickup_location);
        assert_eq!(req.special_requests, "Late pickup");

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["pickupLocation"]["city"], "Austin");
        assert_eq!(json["paymentMethod"], "credit_card");
        assert_eq!(json["startDate"], "2024-01-01T00:00:00Z");
    }
}
