//! Review filtering by location keywords and date range
//!
//! Filtering never re-sorts: output order is always the input (store) order.

use crate::domain::Review;
use crate::services::dates::DateRange;
use smallvec::SmallVec;

/// Multi-keyword, case-insensitive, all-must-match substring query over locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    keywords: SmallVec<[String; 4]>,
}

impl LocationQuery {
    pub fn parse(text: &str) -> Self {
        Self { keywords: text.split_whitespace().map(str::to_lowercase).collect() }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// A review with no location never matches.
    pub fn matches(&self, location: &str) -> bool {
        if location.is_empty() {
            return false;
        }
        let location = location.to_lowercase();
        self.keywords.iter().all(|kw| location.contains(kw.as_str()))
    }
}

/// Select reviews matching the optional location query and the date range
pub fn filter_reviews<'a>(
    reviews: &'a [Review],
    range: &DateRange,
    location: Option<&LocationQuery>,
) -> Vec<&'a Review> {
    reviews
        .iter()
        .filter(|r| location.is_none_or(|q| q.matches(&r.location)))
        .filter(|r| range.is_unbounded() || range.contains(&r.timestamp))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReviewId, TIMESTAMP_FORMAT};
    use chrono::NaiveDateTime;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    fn review(id: &str, location: &str, ts: &str) -> Review {
        Review {
            id: ReviewId::from(id),
            location: location.to_string(),
            timestamp: dt(ts),
            body: format!("body of {id}"),
        }
    }

    /// Store-ordered fixture (timestamp descending)
    fn store() -> Vec<Review> {
        vec![
            review("a", "San Diego, California", "2024-01-06 00:00:01"),
            review("b", "El Paso, Texas", "2024-01-05 23:59:00"),
            review("c", "San Diego, California", "2024-01-05 10:00:00"),
            review("d", "Denver, Colorado", "2024-01-03 08:30:00"),
            review("e", "Salt Lake City, Utah", "2024-01-01 00:00:00"),
            review("f", "", "2023-12-31 12:00:00"),
        ]
    }

    fn ids(reviews: &[&Review]) -> Vec<String> {
        reviews.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn test_no_filters_returns_full_store_in_order() {
        let store = store();
        let out = filter_reviews(&store, &DateRange::default(), None);
        assert_eq!(ids(&out), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_location_query_matches_all_keywords_case_insensitively() {
        let q = LocationQuery::parse("san diego");
        assert!(q.matches("San Diego, California"));
        assert!(!q.matches("El Paso, Texas"));

        let q = LocationQuery::parse("CALIFORNIA diego");
        assert!(q.matches("San Diego, California"));

        let q = LocationQuery::parse("san texas");
        assert!(!q.matches("San Diego, California"));
    }

    #[test]
    fn test_location_query_never_matches_empty_location() {
        assert!(!LocationQuery::parse("   ").matches(""));
        assert!(LocationQuery::parse("   ").matches("Denver, Colorado"));
    }

    #[test]
    fn test_location_only() {
        let store = store();
        let q = LocationQuery::parse("san diego");
        let out = filter_reviews(&store, &DateRange::default(), Some(&q));
        assert_eq!(ids(&out), vec!["a", "c"]);
    }

    #[test]
    fn test_bare_end_date_includes_whole_day() {
        let store = store();
        let range = DateRange::new(None, Some(dt("2024-01-05 23:59:59")));
        let out = filter_reviews(&store, &range, None);
        assert_eq!(ids(&out), vec!["b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_start_only() {
        let store = store();
        let range = DateRange::new(Some(dt("2024-01-05 00:00:00")), None);
        let out = filter_reviews(&store, &range, None);
        assert_eq!(ids(&out), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_location_and_range_combined() {
        let store = store();
        let q = LocationQuery::parse("diego");
        let range = DateRange::new(Some(dt("2024-01-01 00:00:00")), Some(dt("2024-01-05 23:59:59")));
        let out = filter_reviews(&store, &range, Some(&q));
        assert_eq!(ids(&out), vec!["c"]);
    }

    #[test]
    fn test_nothing_matches_returns_empty() {
        let store = store();
        let q = LocationQuery::parse("tucson");
        assert!(filter_reviews(&store, &DateRange::default(), Some(&q)).is_empty());

        let range = DateRange::new(Some(dt("2030-01-01 00:00:00")), None);
        assert!(filter_reviews(&store, &range, None).is_empty());
    }

    #[test]
    fn test_range_partitions_store() {
        let store = store();
        let range = DateRange::new(Some(dt("2024-01-03 08:30:00")), Some(dt("2024-01-05 23:59:00")));
        let out = filter_reviews(&store, &range, None);

        for r in &store {
            let included = out.iter().any(|o| o.id == r.id);
            let within = range.start.unwrap() <= r.timestamp && r.timestamp <= range.end.unwrap();
            assert_eq!(included, within, "review {}", r.id);
        }
        assert_eq!(ids(&out), vec!["b", "c", "d"]);
    }
}
