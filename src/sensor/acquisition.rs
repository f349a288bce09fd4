use std::time::Duration;

use anyhow::bail;
use chrono::Local;
use log::{error, info, warn};
use tokio::sync::watch;
use tokio::time::sleep;

use crate::config::{RECONNECT_BACKOFF, SAMPLE_INTERVAL};
use crate::logfile::MeasurementLog;
use crate::reading::{RawSample, SensorReading, SensorStatus};
use crate::sensor::{SensorTransport, synthetic_sample};
use crate::state::StateStore;

/// Polls the sensor and keeps the state store and measurement log current.
///
/// Connection handling: with no transport injected, every cycle produces a
/// `Simulated` reading. With a transport, the loop opens it lazily, backs off
/// 5 s on a failed open (substituting one synthetic reading so the store and
/// log never go stale), and on a read failure closes the transport and
/// reconnects on the next cycle.
pub struct AcquisitionLoop {
    transport: Option<Box<dyn SensorTransport>>,
    connected: bool,
    store: StateStore,
    log: MeasurementLog,
}

impl AcquisitionLoop {
    pub fn new(
        transport: Option<Box<dyn SensorTransport>>,
        store: StateStore,
        log: MeasurementLog,
    ) -> Self {
        if transport.is_none() {
            warn!("sensor transport unavailable, running in mock mode");
        }

        Self {
            transport,
            connected: false,
            store,
            log,
        }
    }

    /// Runs one polling cycle and returns how long to wait before the next.
    pub fn cycle(&mut self) -> Duration {
        if self.transport.is_none() {
            self.accept(synthetic_sample(), SensorStatus::Simulated);
            return SAMPLE_INTERVAL;
        }

        if !self.connected {
            if let Err(err) = self.open_transport() {
                warn!("sensor connection failed: {err:#}");
                self.accept(synthetic_sample(), SensorStatus::Disconnected);
                return RECONNECT_BACKOFF;
            }
        }

        match self.read_transport() {
            Ok(raw) => self.accept(raw, SensorStatus::Active),
            Err(err) => {
                error!("sensor read failed: {err:#}");
                self.close_transport();
                self.accept(synthetic_sample(), SensorStatus::Error);
            }
        }

        SAMPLE_INTERVAL
    }

    fn open_transport(&mut self) -> anyhow::Result<()> {
        if let Some(transport) = &mut self.transport {
            transport.open()?;
        }
        self.connected = true;
        info!("connected to particulate sensor");
        Ok(())
    }

    fn read_transport(&mut self) -> anyhow::Result<RawSample> {
        match &mut self.transport {
            Some(transport) => transport.read(),
            None => bail!("sensor transport unavailable"),
        }
    }

    fn close_transport(&mut self) {
        if let Some(transport) = &mut self.transport {
            transport.close();
        }
        self.connected = false;
    }

    /// Rounds, stamps, stores and logs one reading as a unit.
    fn accept(&mut self, raw: RawSample, status: SensorStatus) {
        let reading = SensorReading::from_raw(raw, status, Local::now());
        self.store.update(reading.clone());

        if let Err(err) = self.log.append(&reading) {
            error!("measurement log append failed: {err:#}");
        }
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("acquisition loop started");

        loop {
            let delay = self.cycle();

            tokio::select! {
                _ = sleep(delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        if self.connected {
            self.close_transport();
        }
        info!("acquisition loop stopped");
    }
}
