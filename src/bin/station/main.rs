mod args;

use std::process::ExitCode;

use aeroink_station::config::Config;
use aeroink_station::display::DisplayDriver;
use aeroink_station::sensor::SensorTransport;
use aeroink_station::station::Station;
use anyhow::{Context as _, Result};
use args::Args;
use clap::Parser as _;
use log::info;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();
    let config = Config::new(&args.data_dir, &args.upload_dir);

    let (transport, driver) = if args.simulate {
        info!("simulation forced, skipping hardware capabilities");
        (None, None)
    } else {
        detect_hardware()
    };

    let station = Station::start(config, transport, driver, None)?;

    info!("press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("failed to wait for shutdown signal")?;

    station.shutdown().await
}

/// Wiring point for deployments with real hardware: construct the SEN5x
/// transport, the panel driver and the touch button here. The stock build
/// carries none of them, so detection comes up empty and the station runs on
/// mock data with frames written to the debug PNG.
fn detect_hardware() -> (
    Option<Box<dyn SensorTransport>>,
    Option<Box<dyn DisplayDriver>>,
) {
    (None, None)
}
