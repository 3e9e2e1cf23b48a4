// src/analytics.rs
//! Dashboard statistics over a user's own application records.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TIMELINE_MONTHS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Applied,
    Interviewing,
    Offer,
    Rejected,
    /// Any status this service does not track. Counted in totals only.
    #[serde(other)]
    Unknown,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Need to Apply",
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interviewing => "Interviewing",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub status: ApplicationStatus,
    #[serde(default)]
    pub salary: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBreakdown {
    pub status: ApplicationStatus,
    pub label: &'static str,
    pub count: usize,
    pub percentage: f64,
    pub average_salary: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    /// `YYYY-MM`
    pub month: String,
    pub added: usize,
    pub cumulative: usize,
    pub by_status: BTreeMap<ApplicationStatus, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total: usize,
    pub success_rate: f64,
    pub response_rate: f64,
    pub average_salary: Option<f64>,
    pub most_recent: Option<DateTime<Utc>>,
    pub statuses: Vec<StatusBreakdown>,
    pub timeline: Vec<TimelinePoint>,
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn month_key(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

/// The last `count` months ending with the month of `today`, oldest first.
fn trailing_months(today: NaiveDate, count: u32) -> Vec<(i32, u32)> {
    let current = today.year() * 12 + today.month0() as i32;
    (0..count as i32)
        .rev()
        .map(|back| {
            let index = current - back;
            (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
        })
        .collect()
}

pub fn summarize(records: &[ApplicationRecord], today: NaiveDate) -> AnalyticsSummary {
    let total = records.len();

    let mut counts: BTreeMap<ApplicationStatus, usize> = BTreeMap::new();
    let mut salaries: BTreeMap<ApplicationStatus, Vec<f64>> = BTreeMap::new();
    let mut all_salaries = Vec::new();

    for record in records {
        let salary = record.salary.filter(|s| *s > 0.0);
        if let Some(salary) = salary {
            all_salaries.push(salary);
        }
        if record.status == ApplicationStatus::Unknown {
            continue;
        }
        *counts.entry(record.status).or_default() += 1;
        if let Some(salary) = salary {
            salaries.entry(record.status).or_default().push(salary);
        }
    }

    let count_of = |status: ApplicationStatus| counts.get(&status).copied().unwrap_or(0);

    let mut statuses: Vec<StatusBreakdown> = ApplicationStatus::ALL
        .iter()
        .filter(|status| count_of(**status) > 0)
        .map(|&status| StatusBreakdown {
            status,
            label: status.label(),
            count: count_of(status),
            percentage: percent(count_of(status), total),
            average_salary: salaries.get(&status).and_then(|s| mean(s)),
        })
        .collect();
    statuses.sort_by(|a, b| b.count.cmp(&a.count));

    AnalyticsSummary {
        total,
        success_rate: percent(count_of(ApplicationStatus::Offer), total),
        response_rate: percent(
            count_of(ApplicationStatus::Interviewing) + count_of(ApplicationStatus::Offer),
            total,
        ),
        average_salary: mean(&all_salaries),
        most_recent: records.iter().map(|r| r.created_at).max(),
        statuses,
        timeline: timeline(records, today),
    }
}

/// Cumulative counts over the trailing months. Records older than the
/// window are not counted.
pub fn timeline(records: &[ApplicationRecord], today: NaiveDate) -> Vec<TimelinePoint> {
    let mut monthly: BTreeMap<String, (usize, BTreeMap<ApplicationStatus, usize>)> =
        BTreeMap::new();
    for record in records {
        let key = month_key(record.created_at.year(), record.created_at.month());
        let (added, by_status) = monthly.entry(key).or_default();
        *added += 1;
        if record.status != ApplicationStatus::Unknown {
            *by_status.entry(record.status).or_default() += 1;
        }
    }

    let mut cumulative = 0;
    trailing_months(today, TIMELINE_MONTHS)
        .into_iter()
        .map(|(year, month)| {
            let key = month_key(year, month);
            let (added, by_status) = monthly.remove(&key).unwrap_or_default();
            cumulative += added;
            TimelinePoint {
                month: key,
                added,
                cumulative,
                by_status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(status: ApplicationStatus, salary: Option<f64>, y: i32, m: u32, d: u32) -> ApplicationRecord {
        ApplicationRecord {
            status,
            salary,
            created_at: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&[], today());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.average_salary, None);
        assert_eq!(summary.most_recent, None);
        assert!(summary.statuses.is_empty());
        assert_eq!(summary.timeline.len(), 6);
        assert!(summary.timeline.iter().all(|p| p.cumulative == 0));
    }

    #[test]
    fn test_rates_and_salaries() {
        use ApplicationStatus::*;
        let records = vec![
            record(Applied, Some(40_000.0), 2025, 1, 3),
            record(Applied, None, 2025, 1, 20),
            record(Interviewing, Some(60_000.0), 2025, 2, 1),
            record(Offer, Some(80_000.0), 2025, 3, 2),
            record(Rejected, Some(0.0), 2024, 12, 5),
            record(Pending, None, 2025, 3, 10),
        ];

        let summary = summarize(&records, today());
        assert_eq!(summary.total, 6);
        assert_eq!(summary.success_rate, 16.7);
        assert_eq!(summary.response_rate, 33.3);
        assert_eq!(summary.average_salary, Some(60_000.0));
        assert_eq!(
            summary.most_recent,
            Some(Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap())
        );

        assert_eq!(summary.statuses[0].status, Applied);
        assert_eq!(summary.statuses[0].count, 2);
        assert_eq!(summary.statuses[0].percentage, 33.3);
        assert_eq!(summary.statuses[0].average_salary, Some(40_000.0));

        let rejected = summary.statuses.iter().find(|s| s.status == Rejected).unwrap();
        assert_eq!(rejected.average_salary, None);
    }

    #[test]
    fn test_timeline_is_cumulative_over_six_months() {
        use ApplicationStatus::*;
        let records = vec![
            record(Applied, None, 2024, 6, 1),
            record(Applied, None, 2024, 10, 1),
            record(Offer, None, 2024, 10, 9),
            record(Rejected, None, 2025, 3, 1),
        ];

        let points = timeline(&records, today());
        let months: Vec<&str> = points.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(
            months,
            ["2024-10", "2024-11", "2024-12", "2025-01", "2025-02", "2025-03"]
        );

        assert_eq!(points[0].added, 2);
        assert_eq!(points[0].by_status.get(&Offer), Some(&1));
        assert_eq!(points[4].cumulative, 2);
        assert_eq!(points[5].cumulative, 3);
    }

    #[test]
    fn test_unrecognised_status_counts_in_total_only() {
        let records: Vec<ApplicationRecord> = serde_json::from_str(
            r#"[
                {"status":"applied","created_at":"2025-03-01T00:00:00Z"},
                {"status":"ghosted","salary":70000,"created_at":"2025-03-02T00:00:00Z"}
            ]"#,
        )
        .unwrap();
        assert_eq!(records[1].status, ApplicationStatus::Unknown);

        let summary = summarize(&records, today());
        assert_eq!(summary.total, 2);
        assert_eq!(summary.statuses.len(), 1);
        assert_eq!(summary.statuses[0].status, ApplicationStatus::Applied);
        assert_eq!(summary.statuses[0].percentage, 50.0);

        let march = summary.timeline.last().unwrap();
        assert_eq!(march.added, 2);
        assert_eq!(march.by_status.len(), 1);
    }

    #[test]
    fn test_trailing_months_cross_year() {
        let months = trailing_months(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(), 3);
        assert_eq!(months, vec![(2024, 12), (2025, 1), (2025, 2)]);
    }

    #[test]
    fn test_status_wire_format() {
        let record: ApplicationRecord = serde_json::from_str(
            r#"{"status":"interviewing","salary":55000,"created_at":"2025-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        assert_eq!(record.status, ApplicationStatus::Interviewing);
        assert_eq!(record.salary, Some(55_000.0));
    }
}
