//! Customer profile editor

use crate::task::{TaskSlot, guarded};
use crate::{ClientError, ClientResult, RentalApi};
use shared::error::{AppError, ErrorCode};
use shared::models::{Profile, ProfileUpdate};
use tokio_util::sync::CancellationToken;
use validator::Validate;

pub const MSG_LOAD_PROFILE_FAILED: &str = "Failed to load user profile";
pub const MSG_UPDATE_PROFILE_FAILED: &str = "Failed to update profile";
pub const MSG_PROFILE_UPDATED: &str = "Profile updated successfully";

/// Editable profile field, addressed by its dotted form path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FirstName,
    LastName,
    Phone,
    Street,
    City,
    State,
    ZipCode,
    Country,
    LicenseNumber,
    LicenseExpiry,
    LicenseState,
}

impl ProfileField {
    /// `"address.city"` → [`ProfileField::City`]. Email has no field.
    pub fn from_path(path: &str) -> Option<Self> {
        let field = match path {
            "firstName" => Self::FirstName,
            "lastName" => Self::LastName,
            "phone" => Self::Phone,
            "address.street" => Self::Street,
            "address.city" => Self::City,
            "address.state" => Self::State,
            "address.zipCode" => Self::ZipCode,
            "address.country" => Self::Country,
            "driverLicense.number" => Self::LicenseNumber,
            "driverLicense.expiryDate" => Self::LicenseExpiry,
            "driverLicense.state" => Self::LicenseState,
            _ => return None,
        };
        Some(field)
    }

    /// Plain text slot; the optional expiry has none
    fn slot<'a>(&self, draft: &'a mut ProfileUpdate) -> Option<&'a mut String> {
        let slot = match self {
            Self::FirstName => &mut draft.first_name,
            Self::LastName => &mut draft.last_name,
            Self::Phone => &mut draft.phone,
            Self::Street => &mut draft.address.street,
            Self::City => &mut draft.address.city,
            Self::State => &mut draft.address.state,
            Self::ZipCode => &mut draft.address.zip_code,
            Self::Country => &mut draft.address.country,
            Self::LicenseNumber => &mut draft.driver_license.number,
            Self::LicenseState => &mut draft.driver_license.state,
            Self::LicenseExpiry => return None,
        };
        Some(slot)
    }
}

#[derive(Debug, Default)]
pub struct ProfileEditor {
    profile: TaskSlot<Profile>,
    draft: ProfileUpdate,
    saving: bool,
    error: Option<String>,
    notice: Option<String>,
    cancel: CancellationToken,
}

impl ProfileEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load<A>(&mut self, api: &A)
    where
        A: RentalApi + ?Sized,
    {
        let ticket = self.profile.begin();
        let result = guarded(&self.cancel, api.get_profile()).await;
        match &result {
            Ok(profile) => self.draft = form_draft(profile),
            Err(e) => tracing::warn!(error = %e, "Error fetching profile"),
        }
        self.profile.finish_with(ticket, result, MSG_LOAD_PROFILE_FAILED);
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.value()
    }

    pub fn is_loading(&self) -> bool {
        self.profile.is_loading()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.profile.error()
    }

    /// Read-only; the API rejects email changes
    pub fn email(&self) -> Option<&str> {
        self.profile().map(|p| p.email.as_str())
    }

    pub fn draft(&self) -> &ProfileUpdate {
        &self.draft
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        match field.slot(&mut self.draft) {
            Some(slot) => *slot = value,
            None => {
                let value = value.trim();
                self.draft.driver_license.expiry_date =
                    (!value.is_empty()).then(|| value.to_string());
            }
        }
    }

    /// Apply an edit addressed by form path. Email is read-only.
    pub fn set_path(&mut self, path: &str, value: impl Into<String>) -> Result<(), AppError> {
        match ProfileField::from_path(path) {
            Some(field) => {
                self.set(field, value);
                Ok(())
            }
            None if path == "email" => Err(AppError::new(ErrorCode::EmailImmutable)),
            None => Err(AppError::invalid_request(format!("Unknown profile field: {path}"))),
        }
    }

    /// Drop unsaved edits
    pub fn reset(&mut self) {
        if let Some(profile) = self.profile.value() {
            self.draft = form_draft(profile);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.profile()
            .map(|p| form_draft(p) != self.draft)
            .unwrap_or(false)
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Send the draft; the stored profile is replaced with the server's copy
    pub async fn save<A>(&mut self, api: &A) -> ClientResult<&Profile>
    where
        A: RentalApi + ?Sized,
    {
        self.error = None;
        self.notice = None;
        if let Err(errors) = self.draft.validate() {
            let err = ClientError::from(AppError::from(errors));
            self.error = Some(err.user_message(MSG_UPDATE_PROFILE_FAILED));
            return Err(err);
        }

        self.saving = true;
        let result = guarded(&self.cancel, api.update_profile(&self.draft)).await;
        self.saving = false;

        match result {
            Ok(profile) => {
                tracing::info!(user_id = %profile.id, "Profile updated");
                self.draft = form_draft(&profile);
                self.profile.set(profile);
                self.notice = Some(MSG_PROFILE_UPDATED.to_string());
                self.profile
                    .value()
                    .ok_or_else(|| ClientError::InvalidResponse("profile missing after update".into()))
            }
            Err(e) => {
                if !e.is_cancelled() {
                    tracing::warn!(error = %e, "Error updating profile");
                    self.error = Some(e.user_message(MSG_UPDATE_PROFILE_FAILED));
                }
                Err(e)
            }
        }
    }

    /// Token another task can cancel to tear the view down mid-request
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn teardown(&mut self) {
        self.cancel.cancel();
        self.profile.invalidate();
    }
}

impl Drop for ProfileEditor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Editable copy of a profile; the licence expiry keeps only its date
fn form_draft(profile: &Profile) -> ProfileUpdate {
    let mut draft = ProfileUpdate::from(profile);
    draft.driver_license.expiry_date = profile.driver_license.expiry_day().map(str::to_string);
    draft
}
