use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::models::{ApplicationRecord, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    /// All -> applied -> interview -> offer -> rejected -> All.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(Status::Applied),
            StatusFilter::Only(Status::Rejected) => StatusFilter::All,
            StatusFilter::Only(status) => StatusFilter::Only(status.next()),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.pad("all"),
            StatusFilter::Only(status) => fmt::Display::fmt(status, f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<Status>()
            .map(StatusFilter::Only)
            .map_err(|_| ParseError {
                kind: "status filter",
                value: s.to_string(),
                expected: "all, applied, interview, offer, rejected",
            })
    }
}

/// Records whose status passes `status_filter` and whose company or position
/// contains `search_term`, ignoring case. Store order is preserved.
pub fn filter<'a>(
    records: &'a [ApplicationRecord],
    search_term: &str,
    status_filter: StatusFilter,
) -> Vec<&'a ApplicationRecord> {
    let needle = search_term.to_lowercase();
    records
        .iter()
        .filter(|r| status_filter.matches(r.status))
        .filter(|r| {
            needle.is_empty()
                || r.company.to_lowercase().contains(&needle)
                || r.position.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn record(id: i64, company: &str, position: &str, status: Status) -> ApplicationRecord {
        ApplicationRecord {
            id,
            company: company.to_string(),
            position: position.to_string(),
            location: String::new(),
            salary: String::new(),
            status,
            job_type: Default::default(),
            remote: false,
            application_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            notes: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<ApplicationRecord> {
        vec![
            record(1, "Google", "Site Reliability Engineer", Status::Applied),
            record(2, "Meta", "Software Engineer", Status::Interview),
            record(3, "Stripe", "Backend Engineer", Status::Offer),
            record(4, "Goodnotes", "iOS Developer", Status::Rejected),
        ]
    }

    fn ids(found: &[&ApplicationRecord]) -> Vec<i64> {
        found.iter().map(|r| r.id).collect()
    }

    #[test]
    fn empty_search_and_all_returns_everything_in_order() {
        let records = sample();
        assert_eq!(ids(&filter(&records, "", StatusFilter::All)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn search_is_case_insensitive_over_company() {
        let records = sample();
        let found = filter(&records, "goo", StatusFilter::All);
        assert_eq!(ids(&found), vec![1, 4]);
        assert!(found.iter().all(|r| r.company != "Meta"));
    }

    #[test]
    fn search_also_matches_position() {
        let records = sample();
        assert_eq!(ids(&filter(&records, "BACKEND", StatusFilter::All)), vec![3]);
        assert_eq!(ids(&filter(&records, "engineer", StatusFilter::All)), vec![1, 2, 3]);
    }

    #[test]
    fn status_filter_combines_with_search() {
        let records = sample();
        let interview = StatusFilter::Only(Status::Interview);
        assert_eq!(ids(&filter(&records, "", interview)), vec![2]);
        assert!(filter(&records, "google", interview).is_empty());
    }

    #[test]
    fn status_filter_parses_and_cycles() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "offer".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(Status::Offer))
        );
        assert!("pending".parse::<StatusFilter>().is_err());

        let mut f = StatusFilter::All;
        for _ in 0..5 {
            f = f.next();
        }
        assert_eq!(f, StatusFilter::All);
    }
}
