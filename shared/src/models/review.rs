//! Review Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review author (populated by the API)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuthor {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Vehicle review shown on the detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// 1 to 5
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ReviewAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    pub fn author_name(&self) -> String {
        self.user
            .as_ref()
            .map(|u| format!("{} {}", u.first_name, u.last_name).trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Anonymous".to_string())
    }

    pub fn stars(&self) -> String {
        let filled = usize::from(self.rating.min(5));
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_author_and_stars() {
        let review: Review = serde_json::from_str(
            r#"{"_id":"r1","rating":4,"comment":"Smooth ride","user":{"firstName":"Alan","lastName":"Turing"}}"#,
        )
        .unwrap();
        assert_eq!(review.author_name(), "Alan Turing");
        assert_eq!(review.stars(), "★★★★☆");

        let anonymous: Review = serde_json::from_str(r#"{"id":"r2","rating":9}"#).unwrap();
        assert_eq!(anonymous.author_name(), "Anonymous");
        assert_eq!(anonymous.stars(), "★★★★★");
    }
}
