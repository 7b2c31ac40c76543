use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog of activities keyed by name, kept in the order the service
/// reported them.
pub type ActivityCatalog = IndexMap<String, Activity>;

/// Label shown for activities that carry no category of their own.
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub participants: Vec<String>,
}

impl Activity {
    /// Category as rendered on a card: the activity's own label, or
    /// [`DEFAULT_CATEGORY`] when the label is absent or empty.
    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(category) if !category.is_empty() => category,
            _ => DEFAULT_CATEGORY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Time,
}

#[derive(Debug, Clone, Error)]
#[error("unknown sort key '{0}', expected 'name' or 'time'")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortKey::Name),
            "time" => Ok(SortKey::Time),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_decoding_preserves_service_order() {
        let raw = r#"{
            "Chess Club": {
                "description": "Learn chess strategies",
                "schedule": "Fridays, 3:30 PM - 5:00 PM",
                "max_participants": 12,
                "participants": ["michael@mergington.edu"]
            },
            "Art Workshop": {
                "description": "Painting and sketching",
                "schedule": "Tuesdays, 4:00 PM",
                "max_participants": 20,
                "category": "Arts",
                "participants": []
            }
        }"#;

        let catalog: ActivityCatalog = serde_json::from_str(raw).expect("decode catalog");
        let names: Vec<&str> = catalog.keys().map(String::as_str).collect();
        assert_eq!(names, ["Chess Club", "Art Workshop"]);
        assert_eq!(catalog["Chess Club"].max_participants, 12);
        assert_eq!(catalog["Art Workshop"].category.as_deref(), Some("Arts"));
    }

    #[test]
    fn category_label_falls_back_when_absent_or_empty() {
        let mut activity = Activity {
            description: String::new(),
            schedule: String::new(),
            max_participants: 10,
            category: None,
            participants: Vec::new(),
        };
        assert_eq!(activity.category_label(), DEFAULT_CATEGORY);

        activity.category = Some(String::new());
        assert_eq!(activity.category_label(), DEFAULT_CATEGORY);

        activity.category = Some("Sports".to_string());
        assert_eq!(activity.category_label(), "Sports");
    }

    #[test]
    fn sort_keys_parse_from_control_values() {
        assert_eq!("name".parse::<SortKey>().expect("name"), SortKey::Name);
        assert_eq!("time".parse::<SortKey>().expect("time"), SortKey::Time);
        assert!("date".parse::<SortKey>().is_err());
    }
}
