//! Core domain model for the subreddit political pulse pipeline.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CRATE_NAME: &str = "pulse-core";

/// Label stored when an entry carries no vibe.
pub const DEFAULT_VIBE: &str = "Unknown";

/// Scale of the persisted `NUMERIC(5,4)` score columns.
pub const SCORE_SCALE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonthDayError {
    #[error("expected a M/D or MM/DD date, got {0:?}")]
    Malformed(String),
    #[error("{year}-{month:02}-{day:02} is not a calendar date")]
    OutOfRange { year: i32, month: u32, day: u32 },
}

/// Resolve a yearless "M/D" literal against the run's configured year.
pub fn parse_month_day(text: &str, year: i32) -> Result<NaiveDate, MonthDayError> {
    let malformed = || MonthDayError::Malformed(text.to_string());
    let (month, day) = text.trim().split_once('/').ok_or_else(malformed)?;
    let month = parse_component(month).ok_or_else(malformed)?;
    let day = parse_component(day).ok_or_else(malformed)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or(MonthDayError::OutOfRange { year, month, day })
}

fn parse_component(part: &str) -> Option<u32> {
    let part = part.trim();
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Inverse of [`parse_month_day`]: always two-digit month and day.
pub fn format_month_day(date: NaiveDate) -> String {
    format!("{:02}/{:02}", date.month(), date.day())
}

/// Normalized metrics for one subreddit on one day, ready to upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyMetric {
    pub snapshot_date: NaiveDate,
    pub subreddit: String,
    pub left_score: Decimal,
    pub right_score: Decimal,
    pub posts_count: i32,
    pub vibe: String,
    pub trending_politicians: Vec<String>,
}

/// A persisted `daily_subreddit_metrics` row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMetric {
    pub id: i64,
    pub snapshot_date: NaiveDate,
    pub subreddit: String,
    pub left_score: Decimal,
    pub right_score: Decimal,
    pub posts_count: i32,
    pub vibe: String,
    /// Nullable in the table even though inserts always provide a list.
    pub trending_politicians: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One dated record in the exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub date: String,
    pub left: f64,
    pub right: f64,
    pub posts: i32,
    pub vibe: String,
    pub trending_politicians: Vec<String>,
}

/// Denormalized export consumed downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
    pub political_data_map: BTreeMap<String, Vec<ExportRecord>>,
}

impl ExportDocument {
    pub fn record_count(&self) -> usize {
        self.political_data_map.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_day_pads_single_digit_components() {
        let date = parse_month_day("3/7", 2024).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(format_month_day(date), "03/07");
    }

    #[test]
    fn month_day_accepts_padded_and_spaced_input() {
        assert_eq!(
            parse_month_day(" 11/02 ", 2025).unwrap(),
            NaiveDate::from_ymd_opt(2025, 11, 2).unwrap()
        );
    }

    #[test]
    fn month_day_rejects_malformed_literals() {
        for bad in ["", "3", "3/", "/7", "3-7", "a/b", "003/07", "3/7/2024", "+3/7"] {
            assert!(
                matches!(parse_month_day(bad, 2024), Err(MonthDayError::Malformed(_))),
                "{bad:?} should be malformed"
            );
        }
    }

    #[test]
    fn month_day_rejects_impossible_dates() {
        assert_eq!(
            parse_month_day("2/30", 2024),
            Err(MonthDayError::OutOfRange { year: 2024, month: 2, day: 30 })
        );
        assert!(parse_month_day("2/29", 2024).is_ok());
        assert!(parse_month_day("2/29", 2025).is_err());
        assert!(parse_month_day("13/01", 2024).is_err());
    }

    #[test]
    fn export_document_uses_downstream_field_names() {
        let mut map = BTreeMap::new();
        map.insert(
            "politics".to_string(),
            vec![ExportRecord {
                date: "03/07".into(),
                left: 0.42,
                right: 0.58,
                posts: 12,
                vibe: "Tense".into(),
                trending_politicians: vec!["A".into(), "B".into()],
            }],
        );
        let doc = ExportDocument {
            last_updated: "2024-03-08T00:00:00.000Z".into(),
            political_data_map: map,
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["lastUpdated"], "2024-03-08T00:00:00.000Z");
        assert_eq!(value["political_data_map"]["politics"][0]["left"], 0.42);
        assert_eq!(doc.record_count(), 1);
    }
}
