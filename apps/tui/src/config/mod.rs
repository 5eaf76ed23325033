#[allow(clippy::module_inception)]
mod config;

pub use config::{load_config, DashboardConfig, DEFAULT_DEVICE_URL, DEFAULT_LOG_FILE};
