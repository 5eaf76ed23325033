use crate::device::error::DeviceError;
use crate::device::models::{
    AlertEntry, BoardInfo, BufferResponse, GpsInfo, Lockout, LockoutResponse, LogFileInfo,
    LogListResponse, MessageResponse, StorageStatus, SystemStats,
};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Thin client for the detector's onboard HTTP server.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: Client,
    base: Url,
}

impl DeviceClient {
    /// `timeout` of `None` leaves requests unbounded, matching the device UI.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, DeviceError> {
        let base = Url::parse(base_url).map_err(|_| DeviceError::InvalidUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(DeviceError::InvalidUrl(base_url.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| DeviceError::NetworkFailure {
            endpoint: base_url.to_string(),
            source,
        })?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn url(&self, segments: &[&str]) -> Result<Url, DeviceError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| DeviceError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, method: Method, segments: &[&str]) -> Result<String, DeviceError> {
        let url = self.url(segments)?;
        let endpoint = url.path().to_string();
        tracing::debug!(%method, %endpoint, "device request");

        let response = self
            .http
            .request(method, url)
            .send()
            .await
            .map_err(|source| DeviceError::NetworkFailure {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeviceError::HttpStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| DeviceError::NetworkFailure { endpoint, source })
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, DeviceError> {
        let body = self.send(Method::GET, segments).await?;
        decode(segments, &body)
    }

    async fn post_message(&self, segments: &[&str]) -> Result<String, DeviceError> {
        let body = self.send(Method::POST, segments).await?;
        let reply: MessageResponse = decode(segments, &body)?;
        Ok(reply.message)
    }

    pub async fn buffer(&self) -> Result<Vec<AlertEntry>, DeviceError> {
        let response: BufferResponse = self.get_json(&["api", "buffer"]).await?;
        Ok(response.entries)
    }

    pub async fn log_files(&self) -> Result<Vec<LogFileInfo>, DeviceError> {
        let response: LogListResponse = self.get_json(&["api", "logs"]).await?;
        Ok(response.files)
    }

    /// Raw newline-delimited JSON; lines are parsed by the log viewer.
    pub async fn log_file(&self, name: &str) -> Result<String, DeviceError> {
        self.send(Method::GET, &["api", "logs", name]).await
    }

    pub async fn delete_log(&self, name: &str) -> Result<(), DeviceError> {
        self.send(Method::DELETE, &["api", "logs", name]).await?;
        Ok(())
    }

    pub async fn flush(&self) -> Result<String, DeviceError> {
        self.post_message(&["api", "flush"]).await
    }

    pub async fn clear_buffer(&self) -> Result<String, DeviceError> {
        self.post_message(&["api", "buffer", "clear"]).await
    }

    pub async fn storage_status(&self) -> Result<StorageStatus, DeviceError> {
        self.get_json(&["api", "status"]).await
    }

    pub async fn stats(&self) -> Result<SystemStats, DeviceError> {
        self.get_json(&["stats"]).await
    }

    pub async fn gps_info(&self) -> Result<GpsInfo, DeviceError> {
        self.get_json(&["gps-info"]).await
    }

    pub async fn board_info(&self) -> Result<BoardInfo, DeviceError> {
        self.get_json(&["board-info"]).await
    }

    pub async fn lockouts(&self) -> Result<Vec<Lockout>, DeviceError> {
        let response: LockoutResponse = self.get_json(&["lockouts"]).await?;
        Ok(response.lockouts)
    }
}

fn decode<T: DeserializeOwned>(segments: &[&str], body: &str) -> Result<T, DeviceError> {
    serde_json::from_str(body).map_err(|source| DeviceError::MalformedResponse {
        endpoint: format!("/{}", segments.join("/")),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_onto_the_base_path() -> Result<(), DeviceError> {
        let client = DeviceClient::new("http://192.168.4.1/", None)?;
        assert_eq!(
            client.url(&["api", "buffer", "clear"])?.as_str(),
            "http://192.168.4.1/api/buffer/clear"
        );

        let nested = DeviceClient::new("http://device.local/v1", None)?;
        assert_eq!(
            nested.url(&["api", "logs", "log 1.jsonl"])?.as_str(),
            "http://device.local/v1/api/logs/log%201.jsonl"
        );
        Ok(())
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            DeviceClient::new("not a url", None),
            Err(DeviceError::InvalidUrl(_))
        ));
        assert!(matches!(
            DeviceClient::new("mailto:someone@example.com", None),
            Err(DeviceError::InvalidUrl(_))
        ));
    }
}
