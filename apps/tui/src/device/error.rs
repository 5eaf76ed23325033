use thiserror::Error;

/// Failure of a single request to the device.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("request to {endpoint} failed: {source}")]
    NetworkFailure {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} answered with HTTP {status}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("malformed response from {endpoint}: {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid device URL: {0}")]
    InvalidUrl(String),
}

impl DeviceError {
    /// Transport and status failures; the device may simply be out of reach.
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::NetworkFailure { .. } | Self::HttpStatus { .. })
    }
}
