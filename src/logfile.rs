use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use csv::WriterBuilder;

use crate::reading::SensorReading;

const HEADER: [&str; 8] = [
    "Timestamp", "PM1.0", "PM2.5", "PM4.0", "PM10", "VOC", "Temp", "Humidity",
];

/// Append-only CSV record of every accepted reading.
///
/// Rows are written post-rounding, in the same column order as the header.
/// The core never rewrites or deletes existing rows.
#[derive(Debug, Clone)]
pub struct MeasurementLog {
    path: PathBuf,
}

impl MeasurementLog {
    /// Opens the log at `path`, writing the header row if the file does not
    /// exist yet.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .open(&path)
                .with_context(|| format!("failed to create measurement log: {path:?}"))?;
            let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
            writer
                .write_record(HEADER)
                .context("failed to write measurement log header")?;
            writer.flush().context("failed to flush measurement log")?;
        }

        Ok(Self { path })
    }

    pub fn append(&self, reading: &SensorReading) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open measurement log: {:?}", self.path))?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        writer
            .write_record([
                reading.timestamp.clone().unwrap_or_default(),
                format!("{:.1}", reading.pm1_0),
                format!("{:.1}", reading.pm2_5),
                format!("{:.1}", reading.pm4_0),
                format!("{:.1}", reading.pm10),
                format!("{:.0}", reading.voc_index),
                format!("{:.1}", reading.temperature),
                format!("{:.1}", reading.humidity),
            ])
            .context("failed to append measurement row")?;
        writer.flush().context("failed to flush measurement log")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    use chrono::Local;

    use super::*;
    use crate::reading::{RawSample, SensorStatus};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn scratch_file(name: &str) -> PathBuf {
        let id = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "aeroink-logfile-{}-{}-{}.csv",
            std::process::id(),
            id,
            name
        ))
    }

    fn sample_reading(pm2_5: f32) -> SensorReading {
        SensorReading::from_raw(
            RawSample {
                pm1_0: 1.04,
                pm2_5,
                pm4_0: 14.0,
                pm10: 22.0,
                voc_index: 103.4,
                temperature: 21.87,
                humidity: 45.02,
            },
            SensorStatus::Active,
            Local::now(),
        )
    }

    #[test]
    fn creates_header_only_once() {
        let path = scratch_file("header");
        let _ = fs::remove_file(&path);

        let log = MeasurementLog::create(&path).unwrap();
        log.append(&sample_reading(12.3)).unwrap();

        // Re-opening an existing log must not duplicate the header.
        let log = MeasurementLog::create(&path).unwrap();
        log.append(&sample_reading(13.0)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Timestamp,PM1.0,PM2.5,PM4.0,PM10,VOC,Temp,Humidity");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn appends_one_row_per_reading_with_rounded_values() {
        let path = scratch_file("rows");
        let _ = fs::remove_file(&path);

        let log = MeasurementLog::create(&path).unwrap();
        let readings: Vec<_> = [12.34, 13.55, 9.99].map(sample_reading).into();
        for reading in &readings {
            log.append(reading).unwrap();
        }

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), readings.len() + 1);

        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(fields[0], readings[0].timestamp.as_deref().unwrap());
        assert_eq!(fields[1], "1.0");
        assert_eq!(fields[2], "12.3");
        assert_eq!(fields[3], "14.0");
        assert_eq!(fields[4], "22.0");
        assert_eq!(fields[5], "103");
        assert_eq!(fields[6], "21.9");
        assert_eq!(fields[7], "45.0");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn append_to_missing_directory_fails_without_panicking() {
        let log = MeasurementLog {
            path: PathBuf::from("/nonexistent/aeroink/sensor_log.csv"),
        };

        assert!(log.append(&sample_reading(10.0)).is_err());
    }
}
