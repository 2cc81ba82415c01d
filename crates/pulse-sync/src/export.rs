use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use pulse_core::{format_month_day, ExportDocument, ExportRecord, StoredMetric};
use rust_decimal::prelude::ToPrimitive;

/// Reshape stored rows into the grouped export document.
///
/// Groups are keyed by subreddit; within a group rows are ordered by date
/// regardless of input order.
pub fn project_export(rows: &[StoredMetric], generated_at: DateTime<Utc>) -> ExportDocument {
    let mut grouped: BTreeMap<String, Vec<&StoredMetric>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.subreddit.clone()).or_default().push(row);
    }

    let political_data_map = grouped
        .into_iter()
        .map(|(subreddit, mut rows)| {
            rows.sort_by_key(|row| row.snapshot_date);
            let records = rows.into_iter().map(export_record).collect();
            (subreddit, records)
        })
        .collect();

    ExportDocument {
        last_updated: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        political_data_map,
    }
}

fn export_record(row: &StoredMetric) -> ExportRecord {
    ExportRecord {
        date: format_month_day(row.snapshot_date),
        left: row.left_score.to_f64().unwrap_or_default(),
        right: row.right_score.to_f64().unwrap_or_default(),
        posts: row.posts_count,
        vibe: row.vibe.clone(),
        trending_politicians: row.trending_politicians.clone().unwrap_or_default(),
    }
}
