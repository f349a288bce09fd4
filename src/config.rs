use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};

/// 4.2 inch e-Paper resolution.
pub const DISPLAY_WIDTH: u32 = 400;
pub const DISPLAY_HEIGHT: u32 = 300;

/// Delay between sensor polling cycles.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(2);

/// Backoff after a failed attempt to open the sensor transport.
pub const RECONNECT_BACKOFF: Duration = Duration::from_secs(5);

/// Delay between display refresh checks.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Filesystem layout of the station: where the measurement log lives and
/// where uploaded art is stored.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub log_file: PathBuf,
    pub art_path: PathBuf,
    pub debug_frame_path: PathBuf,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let upload_dir = upload_dir.into();
        let log_file = data_dir.join("sensor_log.csv");
        let art_path = upload_dir.join("art.png");
        let debug_frame_path = upload_dir.join("debug_display_out.png");

        Self {
            data_dir,
            upload_dir,
            log_file,
            art_path,
            debug_frame_path,
        }
    }

    pub fn ensure_directories(&self) -> Result<()> {
        ensure_dir(&self.data_dir)?;
        ensure_dir(&self.upload_dir)?;
        Ok(())
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("failed to create directory: {path:?}"))
}
