use std::path::PathBuf;

use log::{debug, error, info};
use tokio::sync::watch;
use tokio::time::sleep;

use crate::config::{Config, REFRESH_INTERVAL};
use crate::display::{Canvas, DisplayDriver, DisplayMode, ModeSwitch, render_data, render_photo};
use crate::reading::SensorReading;
use crate::state::StateStore;

/// The values a redraw is keyed on.
///
/// Humidity and the PM1.0/PM4.0/PM10 channels appear on the panel but do not
/// participate here, and neither does the timestamp; this mirrors the
/// station's long-standing refresh behavior, where only the headline values
/// (and a mode switch) are worth an e-paper repaint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshFingerprint {
    pm2_5: f32,
    voc_index: f32,
    temperature: f32,
    mode: DisplayMode,
}

impl RefreshFingerprint {
    pub fn of(reading: &SensorReading, mode: DisplayMode) -> Self {
        Self {
            pm2_5: reading.pm2_5,
            voc_index: reading.voc_index,
            temperature: reading.temperature,
            mode,
        }
    }
}

/// Watches the state store and repaints the panel when something worth
/// showing changed.
///
/// The panel takes seconds to repaint, so every tick first decides whether a
/// refresh is due at all: either the fingerprint moved or the button forced
/// one. Rendering and pushing happen on a snapshot, never under the store's
/// lock.
pub struct DisplayLoop {
    store: StateStore,
    mode: ModeSwitch,
    driver: Option<Box<dyn DisplayDriver>>,
    art_path: PathBuf,
    debug_frame_path: PathBuf,
    last_fingerprint: Option<RefreshFingerprint>,
}

impl DisplayLoop {
    pub fn new(
        store: StateStore,
        mode: ModeSwitch,
        driver: Option<Box<dyn DisplayDriver>>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            mode,
            driver,
            art_path: config.art_path.clone(),
            debug_frame_path: config.debug_frame_path.clone(),
            last_fingerprint: None,
        }
    }

    /// One refresh check. Returns whether a frame was pushed.
    pub fn tick(&mut self) -> bool {
        let snapshot = self.store.snapshot();
        let mode = self.mode.mode();
        let fingerprint = RefreshFingerprint::of(&snapshot, mode);
        let forced = self.mode.take_forced();

        if !forced && self.last_fingerprint == Some(fingerprint) {
            return false;
        }
        self.last_fingerprint = Some(fingerprint);

        debug!("refreshing display ({} mode)", mode.as_str());
        let canvas = match mode {
            DisplayMode::Data => render_data(&snapshot),
            DisplayMode::Photo => render_photo(&self.art_path),
        };
        self.push(&canvas);

        true
    }

    /// Pushes a frame to the panel, or to the debug PNG when no driver is
    /// attached. A driver error skips this frame; the stale one stays on
    /// screen until the next detected change.
    fn push(&mut self, canvas: &Canvas) {
        match &mut self.driver {
            Some(driver) => {
                let frame = driver.frame(canvas);
                if let Err(err) = driver.display(&frame) {
                    error!("display driver error: {err:#}");
                }
            }
            None => {
                if let Err(err) = canvas.save_png(&self.debug_frame_path) {
                    error!("failed to write debug frame: {err:#}");
                }
            }
        }
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("display loop started");

        if let Some(driver) = &mut self.driver {
            let ready = driver.init().and_then(|()| driver.clear());
            if let Err(err) = ready {
                error!("display init failed, falling back to debug frames: {err:#}");
                self.driver = None;
            }
        }

        loop {
            self.tick();

            tokio::select! {
                _ = sleep(REFRESH_INTERVAL) => {}
                _ = shutdown.changed() => break,
            }
        }

        // Best-effort teardown; a panel that is already gone is not an error
        // worth surfacing during shutdown.
        if let Some(driver) = &mut self.driver {
            if let Err(err) = driver.sleep() {
                debug!("display sleep failed: {err:#}");
            }
            if let Err(err) = driver.power_down() {
                debug!("display power down failed: {err:#}");
            }
        }
        info!("display loop stopped");
    }
}
