use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// Where the measurement log is kept.
    #[arg(long, env = "AEROINK_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Where uploaded art and debug frames are kept.
    #[arg(
        long,
        env = "AEROINK_UPLOAD_DIR",
        default_value = "static/uploads"
    )]
    pub upload_dir: PathBuf,

    /// Skip hardware detection and run on synthetic data.
    #[arg(long, env = "AEROINK_SIMULATE")]
    pub simulate: bool,
}
