//! Dashboard aggregates. Everything here is recomputed from the current
//! collection on demand; nothing is cached between calls.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::models::{ApplicationRecord, Status};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;
/// Longest trend the dashboard will build.
pub const MAX_WINDOW_DAYS: u32 = 366;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub applied: usize,
    pub interview: usize,
    pub offer: usize,
    pub rejected: usize,
}

impl Counts {
    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Applied => self.applied,
            Status::Interview => self.interview,
            Status::Offer => self.offer,
            Status::Rejected => self.rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSlice {
    pub status: Status,
    pub count: usize,
}

/// Integer percentages of the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rates {
    pub offer: u32,
    pub interview: u32,
    pub rejection: u32,
}

/// Everything the dashboard shows, computed together.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub counts: Counts,
    pub rates: Rates,
    pub daily: Vec<DailyBucket>,
    pub distribution: Vec<StatusSlice>,
}

pub fn summarize(records: &[ApplicationRecord], today: NaiveDate, window_days: u32) -> Summary {
    Summary {
        counts: counts(records),
        rates: rates(records),
        daily: daily_series(records, today, window_days),
        distribution: status_distribution(records),
    }
}

pub fn counts(records: &[ApplicationRecord]) -> Counts {
    let mut counts = Counts {
        total: records.len(),
        ..Default::default()
    };
    for record in records {
        match record.status {
            Status::Applied => counts.applied += 1,
            Status::Interview => counts.interview += 1,
            Status::Offer => counts.offer += 1,
            Status::Rejected => counts.rejected += 1,
        }
    }
    counts
}

/// One bucket per calendar day ending at `today`, oldest first. Days with no
/// applications are kept with a zero count. The window is capped at
/// `MAX_WINDOW_DAYS`.
pub fn daily_series(
    records: &[ApplicationRecord],
    today: NaiveDate,
    window_days: u32,
) -> Vec<DailyBucket> {
    (0..window_days.min(MAX_WINDOW_DAYS))
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| DailyBucket {
            date,
            label: date.format("%b %-d").to_string(),
            count: records
                .iter()
                .filter(|r| r.application_date == date)
                .count(),
        })
        .collect()
}

/// Non-empty statuses only, so a pie never draws a zero-width slice.
pub fn status_distribution(records: &[ApplicationRecord]) -> Vec<StatusSlice> {
    let counts = counts(records);
    Status::ALL
        .into_iter()
        .map(|status| StatusSlice {
            status,
            count: counts.get(status),
        })
        .filter(|slice| slice.count > 0)
        .collect()
}

pub fn rates(records: &[ApplicationRecord]) -> Rates {
    let counts = counts(records);
    Rates {
        offer: percent(counts.offer, counts.total),
        interview: percent(counts.interview + counts.offer, counts.total),
        rejection: percent(counts.rejected, counts.total),
    }
}

fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: i64, status: Status, application_date: NaiveDate) -> ApplicationRecord {
        ApplicationRecord {
            id,
            company: format!("Company {}", id),
            position: "Engineer".to_string(),
            location: String::new(),
            salary: String::new(),
            status,
            job_type: Default::default(),
            remote: false,
            application_date,
            notes: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    fn two_applied_one_offer() -> Vec<ApplicationRecord> {
        vec![
            record(1, Status::Applied, date(2024, 6, 1)),
            record(2, Status::Applied, date(2024, 6, 2)),
            record(3, Status::Offer, date(2024, 6, 3)),
        ]
    }

    #[test]
    fn counts_per_status() {
        let c = counts(&two_applied_one_offer());
        assert_eq!(
            c,
            Counts {
                total: 3,
                applied: 2,
                interview: 0,
                offer: 1,
                rejected: 0,
            }
        );
        assert_eq!(c.get(Status::Offer), 1);
    }

    #[test]
    fn rates_round_to_whole_percent() {
        let r = rates(&two_applied_one_offer());
        assert_eq!(
            r,
            Rates {
                offer: 33,
                interview: 33,
                rejection: 0,
            }
        );

        let mut records = two_applied_one_offer();
        records.push(record(4, Status::Interview, date(2024, 6, 4)));
        records.push(record(5, Status::Rejected, date(2024, 6, 4)));
        records.push(record(6, Status::Rejected, date(2024, 6, 4)));
        let r = rates(&records);
        assert_eq!(r.offer, 17);
        assert_eq!(r.interview, 33);
        assert_eq!(r.rejection, 33);
    }

    #[test]
    fn empty_collection_is_all_zero() {
        assert_eq!(counts(&[]), Counts::default());
        assert_eq!(rates(&[]), Rates::default());
        assert!(status_distribution(&[]).is_empty());
    }

    #[test]
    fn daily_series_ends_at_today() {
        let today = date(2024, 3, 2);
        let records = vec![record(1, Status::Applied, today)];
        let series = daily_series(&records, today, DEFAULT_WINDOW_DAYS);

        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, date(2024, 2, 25));
        assert_eq!(series[6].date, today);
        assert_eq!(series[6].count, 1);
        assert!(series[..6].iter().all(|b| b.count == 0));
        assert_eq!(series[6].label, "Mar 2");
        assert_eq!(series[4].label, "Feb 29");
    }

    #[test]
    fn daily_series_ignores_records_outside_window() {
        let today = date(2024, 6, 10);
        let records = vec![
            record(1, Status::Applied, date(2024, 6, 3)),
            record(2, Status::Applied, date(2024, 6, 4)),
            record(3, Status::Interview, date(2024, 6, 4)),
            record(4, Status::Applied, date(2024, 6, 11)),
        ];
        let series = daily_series(&records, today, 7);
        let counts: Vec<usize> = series.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 0, 0, 0, 0, 0, 0]);
        assert!(daily_series(&records, today, 0).is_empty());
    }

    #[test]
    fn daily_series_caps_oversized_windows() {
        let series = daily_series(&[], date(2024, 6, 10), 200_000_000);
        assert_eq!(series.len(), MAX_WINDOW_DAYS as usize);
        assert_eq!(series.last().unwrap().date, date(2024, 6, 10));
    }

    #[test]
    fn summary_serializes_for_json_output() {
        let summary = summarize(&two_applied_one_offer(), date(2024, 6, 3), 3);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["counts"]["total"], 3);
        assert_eq!(json["rates"]["offer"], 33);
        assert_eq!(json["daily"][2]["date"], "2024-06-03");
        assert_eq!(json["distribution"][1]["status"], "offer");
    }

    #[test]
    fn distribution_omits_empty_statuses() {
        let slices = status_distribution(&two_applied_one_offer());
        assert_eq!(
            slices,
            vec![
                StatusSlice {
                    status: Status::Applied,
                    count: 2,
                },
                StatusSlice {
                    status: Status::Offer,
                    count: 1,
                },
            ]
        );
        assert!(slices.iter().all(|s| s.status != Status::Rejected));
    }
}
