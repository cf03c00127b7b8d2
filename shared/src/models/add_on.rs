//! Add-on service catalog

use super::AddOnSelection;
use serde::Serialize;

/// Optional per-day extra offered at booking time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AddOnService {
    pub id: &'static str,
    pub name: &'static str,
    /// Per-day price
    pub price: f64,
}

impl AddOnService {
    /// Fixed catalog, in display order
    pub const CATALOG: &'static [AddOnService] = &[
        AddOnService {
            id: "insurance",
            name: "Full Insurance Coverage",
            price: 25.0,
        },
        AddOnService {
            id: "childSeat",
            name: "Child Seat",
            price: 10.0,
        },
        AddOnService {
            id: "gps",
            name: "GPS Navigation",
            price: 5.0,
        },
        AddOnService {
            id: "additionalDriver",
            name: "Additional Driver",
            price: 15.0,
        },
    ];

    /// Look up by id or display name
    pub fn find(key: &str) -> Option<&'static AddOnService> {
        Self::CATALOG
            .iter()
            .find(|s| s.id.eq_ignore_ascii_case(key) || s.name.eq_ignore_ascii_case(key))
    }

    pub fn to_selection(&self) -> AddOnSelection {
        AddOnSelection {
            name: self.name.to_string(),
            price: self.price,
        }
    }
}
