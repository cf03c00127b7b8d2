//! Customer Profile Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// Postal address stored on the profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
}

/// Driver licence details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverLicense {
    #[serde(default)]
    pub number: String,
    /// ISO date or timestamp as sent by the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub state: String,
}

impl DriverLicense {
    /// Date portion (`YYYY-MM-DD`) of the expiry
    pub fn expiry_day(&self) -> Option<&str> {
        self.expiry_date
            .as_deref()
            .map(|d| d.get(..10).unwrap_or(d))
            .filter(|d| !d.is_empty())
    }
}

/// Customer profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Immutable from the client side
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: PostalAddress,
    #[serde(default)]
    pub driver_license: DriverLicense,
    #[serde(default)]
    pub loyalty_points: i64,
    /// Booking ids (the API may also embed booking records; only ids are kept)
    #[serde(default, deserialize_with = "de::ids")]
    pub bookings: Vec<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Case-insensitive match against name or email
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.full_name().to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
    }
}

/// Profile update payload (`PUT /users/profile`)
///
/// Carries no email field: email is immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub phone: String,
    pub address: PostalAddress,
    pub driver_license: DriverLicense,
}

impl From<&Profile> for ProfileUpdate {
    fn from(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            phone: profile.phone.clone(),
            address: profile.address.clone(),
            driver_license: profile.driver_license.clone(),
        }
    }
}

mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Accept `["id", ...]` or `[{ "_id": "id", ... }, ...]`
    pub fn ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = Vec::<Value>::deserialize(deserializer)?;
        Ok(values
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                Value::Object(map) => map
                    .get("_id")
                    .or_else(|| map.get("id"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect())
    }
}
