//! Day-bucketed averaging of hourly temperature readings.
//!
//! The average over a window is a mean of daily means: each calendar day is
//! averaged on its own first, so a day with fewer readings weighs as much as
//! a full one.

use std::collections::HashMap;

use crate::model::{DailyMean, HourlySeries};

/// Length of the `yyyy-mm-dd` prefix of an ISO timestamp.
const DAY_PREFIX_LEN: usize = 10;

/// Readings of a single calendar day, in series order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub day: String,
    pub readings: Vec<f64>,
}

impl DayBucket {
    pub fn mean(&self) -> f64 {
        self.readings.iter().sum::<f64>() / self.readings.len() as f64
    }
}

/// Calendar day of a timestamp. Shorter strings are their own day.
fn day_of(timestamp: &str) -> &str {
    match timestamp.char_indices().nth(DAY_PREFIX_LEN) {
        Some((end, _)) => &timestamp[..end],
        None => timestamp,
    }
}

/// Group readings by calendar day, keeping days in first-seen order.
///
/// Buckets are only created on their first reading, so none is ever empty.
pub fn bucket_by_day(series: &HourlySeries) -> Vec<DayBucket> {
    let mut buckets: Vec<DayBucket> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (timestamp, temperature) in series.readings() {
        let day = day_of(timestamp);
        match index.get(day) {
            Some(&i) => buckets[i].readings.push(temperature),
            None => {
                index.insert(day, buckets.len());
                buckets.push(DayBucket {
                    day: day.to_string(),
                    readings: vec![temperature],
                });
            }
        }
    }

    buckets
}

pub fn daily_means(series: &HourlySeries) -> Vec<DailyMean> {
    bucket_by_day(series)
        .into_iter()
        .map(|bucket| DailyMean {
            mean: bucket.mean(),
            day: bucket.day,
        })
        .collect()
}

/// Mean of the daily means of `series`, unrounded.
///
/// [`HourlySeries`] is never empty, so there is always at least one day.
pub fn mean_of_daily_means(series: &HourlySeries) -> f64 {
    let means = daily_means(series);
    means.iter().map(|d| d.mean).sum::<f64>() / means.len() as f64
}

/// Render with one decimal place.
///
/// Rounds the exact stored value once, ties to even: `1.15` is stored just
/// below 1.15 and becomes `1.1`, an exact `0.25` becomes `0.2`.
pub fn format_one_decimal(value: f64) -> String {
    format!("{value:.1}")
}
