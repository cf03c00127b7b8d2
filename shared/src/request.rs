//! Request query types
//!
//! Query parameters sent to the rental API list endpoints.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Catalog sort order (`sortBy`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    #[default]
    Recommended,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    YearDesc,
}

impl SortOption {
    pub const ALL: [SortOption; 5] = [
        SortOption::Recommended,
        SortOption::PriceAsc,
        SortOption::PriceDesc,
        SortOption::RatingDesc,
        SortOption::YearDesc,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::PriceAsc => "priceAsc",
            Self::PriceDesc => "priceDesc",
            Self::RatingDesc => "ratingDesc",
            Self::YearDesc => "yearDesc",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Recommended => "Recommended",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::RatingDesc => "Highest Rated",
            Self::YearDesc => "Newest Models",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::invalid_request(format!("Unknown sort option: {}", s)))
    }
}

/// `GET /cars` query
///
/// Multi-valued filters are sent comma-joined; empty filters are omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarQuery {
    pub types: Vec<String>,
    pub makes: Vec<String>,
    pub transmissions: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub location: Option<String>,
    pub featured: Option<bool>,
    pub limit: Option<u32>,
    pub sort: Option<SortOption>,
}

impl CarQuery {
    /// Home page query: four featured vehicles
    pub fn featured_home() -> Self {
        Self {
            featured: Some(true),
            limit: Some(4),
            ..Default::default()
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push_list = |key: &'static str, values: &[String]| {
            if !values.is_empty() {
                pairs.push((key, values.join(",")));
            }
        };
        push_list("type", &self.types);
        push_list("make", &self.makes);
        push_list("transmission", &self.transmissions);

        if let Some(v) = self.min_price {
            pairs.push(("minPrice", v.to_string()));
        }
        if let Some(v) = self.max_price {
            pairs.push(("maxPrice", v.to_string()));
        }
        if let Some(v) = self.min_year {
            pairs.push(("minYear", v.to_string()));
        }
        if let Some(v) = self.max_year {
            pairs.push(("maxYear", v.to_string()));
        }
        if let Some(loc) = self.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            pairs.push(("location", loc.to_string()));
        }
        if let Some(featured) = self.featured {
            pairs.push(("featured", featured.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sortBy", sort.as_str().to_string()));
        }
        pairs
    }
}

/// `GET /cars/{id}/availability` query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AvailabilityQuery {
    pub fn to_query_pairs(&self) -> [(&'static str, String); 2] {
        [
            (
                "startDate",
                self.start.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            ("endDate", self.end.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ]
    }
}

/// `GET /bookings/user` query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingListQuery {
    pub limit: Option<u32>,
}

impl BookingListQuery {
    /// Customer dashboard: three most recent bookings
    pub fn recent() -> Self {
        Self { limit: Some(3) }
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        self.limit
            .map(|l| vec![("limit", l.to_string())])
            .unwrap_or_default()
    }
}
