use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::{Deserializer, Error as DeError};
use serde::{Deserialize, Serialize};

use crate::error::MalformedTimestamp;

// Server payloads evolve; absent or null fields decode to defaults instead
// of failing. A timestamp that is present but unparseable is the one decode
// error that propagates.

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AqiData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub aqi: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pm25: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pm10: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub co: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub no2: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub o3: f64,
    #[serde(default = "Utc::now", deserialize_with = "de_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Compact per-hour projection of AQI history. No timestamp; `hour` is the
/// hour of day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HourlyAqiData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub hour: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub aqi: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Case-insensitive match; unrecognized names fall back to `Medium`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            _ => Severity::Medium,
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Severity::parse_lenient(&raw))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default = "default_alert_title", deserialize_with = "de_alert_title")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: Severity,
    #[serde(default = "Utc::now", deserialize_with = "de_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_read: bool,
    #[serde(default)]
    pub aqi_value: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Alert {
    /// Copy of this alert with `is_read` set. Alerts are value objects;
    /// acknowledgment produces a new value rather than mutating a shared one.
    pub fn as_read(&self) -> Self {
        Alert {
            is_read: true,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

impl Trend {
    /// Case-insensitive match; unrecognized names fall back to `Stable`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "up" => Trend::Up,
            "down" => Trend::Down,
            "stable" => Trend::Stable,
            _ => Trend::Stable,
        }
    }
}

impl<'de> Deserialize<'de> for Trend {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Trend::parse_lenient(&raw))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub predicted_aqi: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
    #[serde(default = "Utc::now", deserialize_with = "de_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trend: Trend,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hourly_predictions: Option<Vec<HourlyPrediction>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPrediction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub hour: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub predicted_aqi: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
}

/// Parse a wire timestamp. Accepts RFC 3339 and the backend's naive ISO 8601
/// form (taken as UTC).
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, MalformedTimestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| MalformedTimestamp(raw.to_string()))
}

fn de_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw).map_err(DeError::custom),
        None => Ok(Utc::now()),
    }
}

// Treats an explicit JSON null the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn de_alert_title<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_alert_title))
}

fn default_alert_title() -> String {
    "Alert".to_string()
}
