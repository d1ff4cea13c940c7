//! Locally generated stand-ins for trend data.
//!
//! Query lists are fixed patterns over the keyword (and the current year for
//! one related entry). The interest series is a bounded random walk, the only
//! non-deterministic part of any fallback.

use crate::models::InterestPoint;
use chrono::{NaiveDate, TimeDelta};
use rand::Rng;

const WALK_START: i64 = 70;
const WALK_STEP: f64 = 7.5;
const WALK_MIN: i64 = 40;
const WALK_MAX: i64 = 100;
const SERIES_DAYS: i64 = 7;

/// The ten fixed related-query phrases for `keyword`.
pub fn related_queries(keyword: &str, year: i32) -> Vec<String> {
    vec![
        format!("{keyword} trends"),
        format!("best {keyword}"),
        format!("{keyword} {year}"),
        format!("how to {keyword}"),
        format!("{keyword} guide"),
        format!("{keyword} tutorial"),
        format!("{keyword} tips"),
        format!("{keyword} examples"),
        format!("learn {keyword}"),
        format!("{keyword} for beginners"),
    ]
}

/// The eight fixed rising-query phrases for `keyword`.
pub fn rising_queries(keyword: &str) -> Vec<String> {
    vec![
        format!("{keyword} AI"),
        format!("{keyword} automation"),
        format!("latest {keyword}"),
        format!("{keyword} tools"),
        format!("{keyword} software"),
        format!("{keyword} free"),
        format!("{keyword} online"),
        format!("{keyword} course"),
    ]
}

/// Seven consecutive days ending on `today`.
///
/// Each value is the previous (clamped) value plus a uniform delta in
/// `[-7.5, 7.5)`, rounded and clamped to `[40, 100]`. The walk starts from 70.
pub fn interest_series<R: Rng>(today: NaiveDate, rng: &mut R) -> Vec<InterestPoint> {
    let mut previous = WALK_START;
    (0..SERIES_DAYS)
        .rev()
        .map(|days_back| {
            let date = today - TimeDelta::days(days_back);
            let delta: f64 = rng.random_range(-WALK_STEP..WALK_STEP);
            let value = ((previous as f64 + delta).round() as i64).clamp(WALK_MIN, WALK_MAX);
            previous = value;
            InterestPoint {
                date: date.format("%Y-%m-%d").to_string(),
                value,
            }
        })
        .collect()
}
