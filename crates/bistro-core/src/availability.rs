//! # Availability Filter
//!
//! Keeps restaurants that can deliver on a given calendar day.
//!
//! ## Day Matching
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  target date: 2024-03-01                                                │
//! │                                                                         │
//! │  Restaurant A  ["2024-03-01T12:00", "2024-03-02T12:00"]  ──► kept      │
//! │                  ▲ same day                                             │
//! │  Restaurant B  ["2024-03-02T09:00"]                      ──► dropped   │
//! │                                                                         │
//! │  The day is read as written in the timestamp. Offsets and time of day  │
//! │  are ignored, so "2024-03-01T23:30:00-05:00" is still March 1st.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::Restaurant;

/// Naive timestamp layouts accepted besides RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Extracts the calendar day of an availability timestamp.
///
/// Returns `None` for anything that is not a recognizable date.
pub fn calendar_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local().date());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// Returns true if any of the restaurant's slots falls on `date`.
pub fn is_available_on(restaurant: &Restaurant, date: NaiveDate) -> bool {
    restaurant
        .availabilities
        .iter()
        .any(|slot| calendar_day(slot) == Some(date))
}

/// Keeps restaurants with at least one availability on `date`.
///
/// With no date the list is returned unchanged. Input order is preserved.
pub fn filter_by_date(restaurants: Vec<Restaurant>, date: Option<NaiveDate>) -> Vec<Restaurant> {
    match date {
        None => restaurants,
        Some(date) => restaurants
            .into_iter()
            .filter(|r| is_available_on(r, date))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Menu, MenuField};
    use serde_json::Map;

    fn restaurant(id: &str, slots: &[&str]) -> Restaurant {
        Restaurant {
            id: id.to_string(),
            name: id.to_string(),
            availabilities: slots.iter().map(|s| s.to_string()).collect(),
            has_menu: MenuField::Inline(Menu::new(Map::new())),
            extra: Map::new(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_calendar_day_formats() {
        let expected = Some(day("2024-03-01"));
        assert_eq!(calendar_day("2024-03-01T12:00:00+01:00"), expected);
        assert_eq!(calendar_day("2024-03-01T12:00:00Z"), expected);
        assert_eq!(calendar_day("2024-03-01T12:00"), expected);
        assert_eq!(calendar_day("2024-03-01T12:00:00.000"), expected);
        assert_eq!(calendar_day("2024-03-01 12:00:00"), expected);
        assert_eq!(calendar_day("2024-03-01"), expected);
        assert_eq!(calendar_day("not a date"), None);
        assert_eq!(calendar_day(""), None);
    }

    #[test]
    fn test_day_is_read_as_written() {
        // Late evening in New York is still March 1st for the restaurant.
        assert_eq!(
            calendar_day("2024-03-01T23:30:00-05:00"),
            Some(day("2024-03-01"))
        );
    }

    #[test]
    fn test_filter_scenario() {
        let a = restaurant("A", &["2024-03-01T12:00", "2024-03-02T12:00"]);
        let b = restaurant("B", &["2024-03-02T09:00"]);

        let kept = filter_by_date(vec![a, b], Some(day("2024-03-01")));

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "A");
    }

    #[test]
    fn test_no_date_returns_input_unchanged() {
        let list = vec![
            restaurant("A", &["2024-03-01T12:00"]),
            restaurant("B", &[]),
            restaurant("C", &["garbage"]),
        ];

        assert_eq!(filter_by_date(list.clone(), None), list);
    }

    #[test]
    fn test_membership_iff_same_day_slot() {
        let target = day("2024-03-01");
        let list = vec![
            restaurant("none", &[]),
            restaurant("other-days", &["2024-02-29T23:59", "2024-03-02T00:00"]),
            restaurant("midnight", &["2024-03-01T00:00"]),
            restaurant("bad-then-good", &["??", "2024-03-01T20:00:00+02:00"]),
        ];

        for r in &list {
            let expected = r.availabilities.iter().any(|s| calendar_day(s) == Some(target));
            let kept = filter_by_date(vec![r.clone()], Some(target));
            assert_eq!(kept.len() == 1, expected, "restaurant {}", r.id);
        }

        let kept: Vec<_> = filter_by_date(list, Some(target))
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(kept, vec!["midnight", "bad-then-good"]);
    }
}
