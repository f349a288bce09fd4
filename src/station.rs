use std::fs;

use anyhow::{Context as _, Result};
use log::info;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::display::{DisplayDriver, DisplayLoop, ModeSwitch};
use crate::input::{ModeInputAdapter, PressInput};
use crate::logfile::MeasurementLog;
use crate::reading::SensorReading;
use crate::sensor::{AcquisitionLoop, SensorTransport};
use crate::state::StateStore;

/// The running station: acquisition and display loops plus the handles the
/// web layer talks to.
///
/// Hardware is injected; `None` for the transport means permanent mock mode,
/// `None` for the driver routes frames to the debug PNG, and without an
/// input capability the mode stays on the data dashboard.
pub struct Station {
    config: Config,
    store: StateStore,
    mode: ModeSwitch,
    shutdown: watch::Sender<bool>,
    acquisition: JoinHandle<()>,
    display: JoinHandle<()>,
}

impl Station {
    /// Prepares directories and the measurement log, then spawns both loops.
    /// Must be called from within a tokio runtime.
    pub fn start(
        config: Config,
        transport: Option<Box<dyn SensorTransport>>,
        driver: Option<Box<dyn DisplayDriver>>,
        input: Option<&mut dyn PressInput>,
    ) -> Result<Self> {
        config.ensure_directories()?;

        let store = StateStore::new();
        let log = MeasurementLog::create(&config.log_file)?;
        let mode = ModeSwitch::new();

        if let Some(input) = input {
            ModeInputAdapter::attach(input, mode.clone());
        }

        let (shutdown, signal) = watch::channel(false);
        let acquisition =
            tokio::spawn(AcquisitionLoop::new(transport, store.clone(), log).run(signal.clone()));
        let display = tokio::spawn(
            DisplayLoop::new(store.clone(), mode.clone(), driver, &config).run(signal),
        );

        info!("station started (data in {:?})", config.data_dir);

        Ok(Self {
            config,
            store,
            mode,
            shutdown,
            acquisition,
            display,
        })
    }

    /// The latest reading, for the dashboard's state endpoint.
    pub fn snapshot(&self) -> SensorReading {
        self.store.snapshot()
    }

    pub fn snapshot_json(&self) -> Result<String> {
        serde_json::to_string(&self.store.snapshot()).context("failed to serialize snapshot")
    }

    /// Handle to the display mode switch, for deployments that wire their
    /// own input capability after startup.
    pub fn mode_switch(&self) -> ModeSwitch {
        self.mode.clone()
    }

    /// Replaces the uploaded art wholesale. The payload is staged next to
    /// the art and renamed over it, so a photo-mode render racing the upload
    /// sees either the old image or the new one, never a torn file.
    pub fn replace_art(&self, payload: &[u8]) -> Result<()> {
        let staging = self.config.art_path.with_extension("png.tmp");

        fs::write(&staging, payload)
            .with_context(|| format!("failed to stage art upload at {staging:?}"))?;
        fs::rename(&staging, &self.config.art_path)
            .with_context(|| format!("failed to replace art at {:?}", self.config.art_path))?;

        Ok(())
    }

    /// Signals both loops to stop and waits for them. Each loop reacts
    /// within one of its sleep intervals at worst.
    pub async fn shutdown(self) -> Result<()> {
        info!("station shutting down");
        let _ = self.shutdown.send(true);

        self.acquisition
            .await
            .context("acquisition task panicked")?;
        self.display.await.context("display task panicked")?;

        Ok(())
    }
}
