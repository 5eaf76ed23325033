// Device module for v1_dashboard
// REST client and wire models for the detector's onboard HTTP server

pub mod client;
pub mod error;
mod lenient;
pub mod models;

pub use client::DeviceClient;
pub use error::DeviceError;
