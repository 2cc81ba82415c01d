//! Coercion of authored entries into upsertable rows.

use pulse_core::{parse_month_day, DailyMetric, DEFAULT_VIBE, SCORE_SCALE};
use pulse_source::literal::number_to_string;
use pulse_source::{Literal, SourceEntry};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::SyncError;

pub fn normalize_entry(
    subreddit: &str,
    index: usize,
    entry: &SourceEntry,
    year: i32,
) -> Result<DailyMetric, SyncError> {
    let invalid = |reason: String| SyncError::InvalidEntry {
        subreddit: subreddit.to_string(),
        index,
        reason,
    };

    let date_text = match entry.date.as_ref() {
        Some(Literal::String(text)) => text.as_str(),
        Some(other) => return Err(invalid(format!("date must be a string, found {}", other.kind()))),
        None => return Err(invalid("missing date".to_string())),
    };
    let snapshot_date = parse_month_day(date_text, year).map_err(|err| invalid(err.to_string()))?;

    Ok(DailyMetric {
        snapshot_date,
        subreddit: subreddit.to_string(),
        left_score: coerce_score("left", entry.left.as_ref()).map_err(invalid)?,
        right_score: coerce_score("right", entry.right.as_ref()).map_err(invalid)?,
        posts_count: coerce_posts(entry.posts.as_ref()).map_err(invalid)?,
        vibe: coerce_vibe(entry.vibe.as_ref()),
        trending_politicians: coerce_politicians(entry.trending_politicians.as_ref()),
    })
}

fn numeric(value: &Literal) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
        .filter(|n| n.is_finite())
}

/// Rounded half away from zero to match `NUMERIC(5,4)` assignment.
fn coerce_score(field: &str, value: Option<&Literal>) -> Result<Decimal, String> {
    let value = value
        .filter(|v| !v.is_nullish())
        .ok_or_else(|| format!("missing {field} score"))?;
    numeric(value)
        .and_then(Decimal::from_f64)
        .map(|d| d.round_dp_with_strategy(SCORE_SCALE, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| format!("{field} score is not numeric: {value:?}"))
}

fn coerce_posts(value: Option<&Literal>) -> Result<i32, String> {
    let Some(n) = value.and_then(numeric) else {
        return Ok(0);
    };
    let n = n.trunc();
    if n < i32::MIN as f64 || n > i32::MAX as f64 {
        return Err(format!("posts count {n} does not fit an INTEGER column"));
    }
    Ok(n as i32)
}

fn coerce_vibe(value: Option<&Literal>) -> String {
    let text = match value {
        Some(Literal::String(s)) => s.clone(),
        Some(Literal::Number(n)) => number_to_string(*n),
        Some(Literal::Bool(b)) => b.to_string(),
        _ => String::new(),
    };
    if text.is_empty() {
        DEFAULT_VIBE.to_string()
    } else {
        text
    }
}

fn coerce_politicians(value: Option<&Literal>) -> Vec<String> {
    let Some(Literal::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Literal::String(s) => Some(s.clone()),
            Literal::Number(n) => Some(number_to_string(*n)),
            Literal::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}
