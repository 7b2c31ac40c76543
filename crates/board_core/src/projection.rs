use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use shared::domain::{Activity, ActivityCatalog, SortKey};

/// First 12-hour clock token in a schedule, e.g. "3:30 PM".
static TIME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d{1,2}:\d{2}\s*[AP]M").expect("static time pattern"));

/// Current values of the toolbar controls. Empty category or search
/// means the control applies no filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub category: String,
    pub search: String,
    pub sort: SortKey,
}

/// Applies the category filter, then the search filter, then the sort,
/// to the catalog in its reported order. Both the card list and the
/// activity selector are fed from the result of a single call.
pub fn project<'a>(
    catalog: &'a ActivityCatalog,
    filter: &ViewFilter,
) -> Vec<(&'a str, &'a Activity)> {
    let mut entries: Vec<(&str, &Activity)> = catalog
        .iter()
        .map(|(name, activity)| (name.as_str(), activity))
        .collect();

    if !filter.category.is_empty() {
        entries.retain(|(_, activity)| {
            activity.category.as_deref() == Some(filter.category.as_str())
        });
    }

    if !filter.search.is_empty() {
        let term = filter.search.to_lowercase();
        entries.retain(|(name, activity)| {
            name.to_lowercase().contains(&term)
                || activity.description.to_lowercase().contains(&term)
        });
    }

    match filter.sort {
        SortKey::Name => entries.sort_by(|a, b| compare_names(a.0, b.0)),
        SortKey::Time => entries.sort_by(|a, b| {
            schedule_time_token(&a.1.schedule).cmp(&schedule_time_token(&b.1.schedule))
        }),
    }

    entries
}

// Case does not partition the order: "apple" sorts before "Banana".
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort key for by-time ordering. Schedules without a clock token get
/// the empty key and sort first. Tokens compare textually, not
/// chronologically, so "10:00 AM" precedes "9:00 AM".
fn schedule_time_token(schedule: &str) -> &str {
    TIME_TOKEN
        .find(schedule)
        .map(|m| m.as_str())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "tests/projection_tests.rs"]
mod tests;
