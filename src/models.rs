//! Data models for weather-station readings and their aggregated forms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---

/// A single timestamped station reading.
///
/// Numeric fields are nullable: a station may report a reading without a
/// humidity value, or a rain gauge may be offline. Readings are never
/// mutated once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reading {
    // ---
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rainfall: Option<f64>,
}

/// One row of the per-minute aggregated query.
///
/// Mean temperature and humidity, summed rainfall. Any field is `None` when
/// every reading in that minute lacked it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MinuteRow {
    // ---
    pub minute: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub rainfall: Option<f64>,
}

/// Batch of readings pushed by one piece of equipment.
#[derive(Debug, Deserialize)]
pub struct IngestBatch {
    // ---
    pub equipment: String,
    pub readings: Vec<Reading>,
}

/// One hour bucket of the dashboard chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPoint {
    // ---
    pub hour_label: String,
    pub mean_temperature: f64,
    pub mean_humidity: f64,
    pub total_rainfall: f64,
    pub delta_t: Option<f64>,
}

/// Chart-ready buckets plus the rainfall summed over the whole window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationReport {
    // ---
    pub points: Vec<AggregatedPoint>,
    pub total_rainfall: f64,
}

// ---

/// Interpret a loosely typed JSON value as a finite number.
///
/// Numbers pass through, numeric strings such as `"21.5"` are parsed, and
/// everything else (null, booleans, garbage strings, NaN) is `None`.
pub fn numeric_value(value: &Value) -> Option<f64> {
    // ---
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Serde adapter applying [`numeric_value`] to an optional field.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    // ---
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(numeric_value))
}

/// Coerce an optional sensor value to a number, treating absence as `0`.
pub fn value_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_reading_accepts_numbers_and_numeric_strings() {
        // ---
        let reading: Reading = serde_json::from_value(json!({
            "timestamp": "2025-03-26T18:45:00Z",
            "temperature": 22.4,
            "humidity": "51.5",
            "rainfall": " 0.2 "
        }))
        .unwrap();

        assert_eq!(
            reading.timestamp,
            Utc.with_ymd_and_hms(2025, 3, 26, 18, 45, 0).unwrap()
        );
        assert_eq!(reading.temperature, Some(22.4));
        assert_eq!(reading.humidity, Some(51.5));
        assert_eq!(reading.rainfall, Some(0.2));
    }

    #[test]
    fn test_reading_missing_and_malformed_fields_become_none() {
        // ---
        let reading: Reading = serde_json::from_value(json!({
            "timestamp": "2025-03-26T18:45:00+10:00",
            "temperature": null,
            "humidity": "n/a"
        }))
        .unwrap();

        assert_eq!(
            reading.timestamp,
            Utc.with_ymd_and_hms(2025, 3, 26, 8, 45, 0).unwrap()
        );
        assert_eq!(reading.temperature, None);
        assert_eq!(reading.humidity, None);
        assert_eq!(reading.rainfall, None);
    }

    #[test]
    fn test_numeric_value_rejects_non_finite() {
        // ---
        assert_eq!(numeric_value(&json!("NaN")), None);
        assert_eq!(numeric_value(&json!("inf")), None);
        assert_eq!(numeric_value(&json!(true)), None);
        assert_eq!(numeric_value(&json!([1])), None);
        assert_eq!(numeric_value(&json!(-3)), Some(-3.0));
    }

    #[test]
    fn test_value_or_zero() {
        // ---
        assert_eq!(value_or_zero(None), 0.0);
        assert_eq!(value_or_zero(Some(f64::NAN)), 0.0);
        assert_eq!(value_or_zero(Some(1.25)), 1.25);
    }

    #[test]
    fn test_missing_timestamp_is_rejected() {
        // ---
        let result = serde_json::from_value::<Reading>(json!({ "temperature": 20 }));
        assert!(result.is_err());
    }
}
