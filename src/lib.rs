pub mod config;
pub mod display;
pub mod input;
pub mod logfile;
pub mod reading;
pub mod sensor;
pub mod state;
pub mod station;
