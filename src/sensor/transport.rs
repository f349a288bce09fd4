use anyhow::Result;

use crate::reading::RawSample;

/// Connection to a physical particulate sensor.
///
/// Implemented outside the core (e.g. over the Pi's I2C bus for a SEN5x
/// node) and injected at startup. Passing no transport at all marks the
/// hardware capability as absent for the lifetime of the process, which
/// diverts acquisition to permanent simulation.
pub trait SensorTransport: Send {
    /// Opens the transport and starts continuous measurement.
    fn open(&mut self) -> Result<()>;

    /// Reads one measured sample.
    fn read(&mut self) -> Result<RawSample>;

    /// Closes the transport. Called after a read failure so the next cycle
    /// reconnects from scratch, and once more on shutdown.
    fn close(&mut self);
}
