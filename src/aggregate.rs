//! Hour-bucketed aggregation of station readings for the dashboard chart.
//!
//! Readings are grouped by the hour of their station-local timestamp. Each
//! bucket reports mean temperature and humidity (1 decimal), summed rainfall
//! (2 decimals) and the Delta T of the rounded means.
//!
//! The default [`BucketMode::HourOfDay`] keys buckets on `"HH:00"` alone, so
//! readings from different calendar days that share an hour land in the same
//! bucket. Dashboards showing more than a day should ask for
//! [`BucketMode::DayHour`] instead.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::delta_t::{delta_t, round_to};
use crate::error::InputError;
use crate::models::{value_or_zero, AggregatedPoint, AggregationReport, Reading};

// ---

/// How readings are assigned to buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketMode {
    /// `"HH:00"`, merging equal hours across days.
    #[default]
    HourOfDay,
    /// `"YYYY-MM-DD HH:00"`, one bucket per calendar hour.
    DayHour,
}

impl BucketMode {
    /// Bucket label for a timestamp seen from the station's local offset.
    pub fn label(self, timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
        // ---
        let local = timestamp.with_timezone(&offset);
        match self {
            BucketMode::HourOfDay => local.format("%H:00").to_string(),
            BucketMode::DayHour => local.format("%Y-%m-%d %H:00").to_string(),
        }
    }
}

impl FromStr for BucketMode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" | "hour_of_day" => Ok(BucketMode::HourOfDay),
            "day_hour" => Ok(BucketMode::DayHour),
            other => Err(InputError::UnknownBucketMode(other.to_string())),
        }
    }
}

/// Running sums for one bucket. Only exists once a reading has been seen.
#[derive(Debug, Clone, PartialEq)]
struct HourBucket {
    // ---
    sum_temperature: f64,
    sum_humidity: f64,
    sum_rainfall: f64,
    count: u32,
}

impl HourBucket {
    fn first(reading: &Reading) -> Self {
        // ---
        HourBucket {
            sum_temperature: value_or_zero(reading.temperature),
            sum_humidity: value_or_zero(reading.humidity),
            sum_rainfall: value_or_zero(reading.rainfall),
            count: 1,
        }
    }

    fn add(&mut self, reading: &Reading) {
        // ---
        self.sum_temperature += value_or_zero(reading.temperature);
        self.sum_humidity += value_or_zero(reading.humidity);
        self.sum_rainfall += value_or_zero(reading.rainfall);
        self.count += 1;
    }

    fn into_point(self, hour_label: String) -> AggregatedPoint {
        // ---
        let count = f64::from(self.count);
        let mean_temperature = round_to(self.sum_temperature / count, 1);
        let mean_humidity = round_to(self.sum_humidity / count, 1);

        AggregatedPoint {
            hour_label,
            mean_temperature,
            mean_humidity,
            total_rainfall: round_to(self.sum_rainfall, 2),
            delta_t: delta_t(Some(mean_temperature), Some(mean_humidity)),
        }
    }
}

/// Reduce readings to one point per hour-of-day label, sorted by label.
///
/// Missing numeric fields count as `0`. The input is only read.
pub fn aggregate_hourly(readings: &[Reading], offset: FixedOffset) -> Vec<AggregatedPoint> {
    aggregate(readings, BucketMode::HourOfDay, offset)
}

/// Reduce readings to one point per bucket of `mode`, sorted by label.
pub fn aggregate(
    readings: &[Reading],
    mode: BucketMode,
    offset: FixedOffset,
) -> Vec<AggregatedPoint> {
    // ---
    let mut buckets: HashMap<String, HourBucket> = HashMap::new();

    for reading in readings {
        let label = mode.label(reading.timestamp, offset);
        match buckets.get_mut(&label) {
            Some(bucket) => bucket.add(reading),
            None => {
                buckets.insert(label, HourBucket::first(reading));
            }
        }
    }

    let mut points: Vec<AggregatedPoint> = buckets
        .into_iter()
        .map(|(label, bucket)| bucket.into_point(label))
        .collect();
    points.sort_by(|a, b| a.hour_label.cmp(&b.hour_label));

    tracing::debug!(
        "Aggregated {} readings into {} {:?} buckets",
        readings.len(),
        points.len(),
        mode
    );
    points
}

/// Total rainfall over every reading, independent of bucketing.
pub fn total_rainfall(readings: &[Reading]) -> f64 {
    // ---
    let sum: f64 = readings.iter().map(|r| value_or_zero(r.rainfall)).sum();
    round_to(sum, 2)
}

/// Buckets plus whole-window rainfall: everything the dashboard renders.
pub fn summarize(readings: &[Reading], mode: BucketMode, offset: FixedOffset) -> AggregationReport {
    // ---
    AggregationReport {
        points: aggregate(readings, mode, offset),
        total_rainfall: total_rainfall(readings),
    }
}
