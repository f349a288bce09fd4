use std::fmt;
use std::str::FromStr;

use anyhow::{Error, bail};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Connection state of the particulate sensor, as exposed to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SensorStatus {
    Starting,
    Active,
    Simulated,
    Disconnected,
    Error,
}

impl SensorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorStatus::Starting => "Starting",
            SensorStatus::Active => "Active",
            SensorStatus::Simulated => "Simulated",
            SensorStatus::Disconnected => "Disconnected",
            SensorStatus::Error => "Error",
        }
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Starting" => Ok(SensorStatus::Starting),
            "Active" => Ok(SensorStatus::Active),
            "Simulated" => Ok(SensorStatus::Simulated),
            "Disconnected" => Ok(SensorStatus::Disconnected),
            "Error" => Ok(SensorStatus::Error),
            _ => bail!("unknown sensor status: {}", s),
        }
    }
}

/// One unrounded measurement as it comes off a transport (or the simulator).
#[derive(Debug, Clone, Copy)]
pub struct RawSample {
    pub pm1_0: f32,
    pub pm2_5: f32,
    pub pm4_0: f32,
    pub pm10: f32,
    pub voc_index: f32,
    pub temperature: f32,
    pub humidity: f32,
}

/// The latest accepted measurement, rounded for display and logging.
///
/// All fields are replaced together; readers never see a half-updated value
/// (see [`StateStore`](crate::state::StateStore)).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub pm1_0: f32,
    pub pm2_5: f32,
    pub pm4_0: f32,
    pub pm10: f32,
    pub voc_index: f32,
    pub temperature: f32,
    pub humidity: f32,
    pub timestamp: Option<String>,
    pub status: SensorStatus,
}

impl SensorReading {
    /// Rounds a raw sample and stamps it, so precision, timestamp and status
    /// always travel together into the store and the log.
    pub fn from_raw(raw: RawSample, status: SensorStatus, now: DateTime<Local>) -> Self {
        Self {
            pm1_0: round1(raw.pm1_0),
            pm2_5: round1(raw.pm2_5),
            pm4_0: round1(raw.pm4_0),
            pm10: round1(raw.pm10),
            voc_index: raw.voc_index.round(),
            temperature: round1(raw.temperature),
            humidity: round1(raw.humidity),
            timestamp: Some(now.format("%Y-%m-%d %H:%M:%S").to_string()),
            status,
        }
    }
}

impl Default for SensorReading {
    fn default() -> Self {
        Self {
            pm1_0: 0.0,
            pm2_5: 0.0,
            pm4_0: 0.0,
            pm10: 0.0,
            voc_index: 0.0,
            temperature: 0.0,
            humidity: 0.0,
            timestamp: None,
            status: SensorStatus::Starting,
        }
    }
}

fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rounds_to_documented_precision() {
        let raw = RawSample {
            pm1_0: 1.26,
            pm2_5: 12.34,
            pm4_0: 13.55,
            pm10: 20.04,
            voc_index: 103.4,
            temperature: 21.88,
            humidity: 44.44,
        };

        let reading = SensorReading::from_raw(raw, SensorStatus::Active, Local::now());

        assert_eq!(reading.pm1_0, 1.3);
        assert_eq!(reading.pm2_5, 12.3);
        assert_eq!(reading.pm4_0, 13.6);
        assert_eq!(reading.pm10, 20.0);
        assert_eq!(reading.voc_index, 103.0);
        assert_eq!(reading.temperature, 21.9);
        assert_eq!(reading.humidity, 44.4);
        assert_eq!(reading.status, SensorStatus::Active);
        assert!(reading.timestamp.is_some());
    }

    #[test]
    fn default_reading_is_zeroed_and_starting() {
        let reading = SensorReading::default();

        assert_eq!(reading.pm2_5, 0.0);
        assert_eq!(reading.timestamp, None);
        assert_eq!(reading.status, SensorStatus::Starting);
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            SensorStatus::Starting,
            SensorStatus::Active,
            SensorStatus::Simulated,
            SensorStatus::Disconnected,
            SensorStatus::Error,
        ] {
            assert_eq!(status.as_str().parse::<SensorStatus>().unwrap(), status);
        }

        assert!("Sleeping".parse::<SensorStatus>().is_err());
    }

    #[test]
    fn reading_serializes_with_snapshot_field_names() {
        let reading = SensorReading::default();
        let json = serde_json::to_value(&reading).unwrap();

        for key in [
            "pm1_0",
            "pm2_5",
            "pm4_0",
            "pm10",
            "voc_index",
            "temperature",
            "humidity",
            "timestamp",
            "status",
        ] {
            assert!(json.get(key).is_some(), "missing field: {key}");
        }
        assert_eq!(json["status"], "Starting");
        assert_eq!(json["timestamp"], serde_json::Value::Null);
    }
}
