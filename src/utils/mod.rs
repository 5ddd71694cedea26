pub mod config;
pub mod logger;
pub mod scan_toml;

pub use config::*;
pub use logger::setup_logging;
pub use scan_toml::{CliOpts, load_scan_toml};
