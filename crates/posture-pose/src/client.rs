//! Pose service HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{PoseError, PoseResult};
use crate::estimator::PoseEstimator;
use crate::types::{HealthResponse, PoseDetection, PoseResponse};

/// Configuration for the pose client.
#[derive(Debug, Clone)]
pub struct PoseClientConfig {
    /// Base URL of the pose service
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Max retries
    pub max_retries: u32,
}

impl Default for PoseClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }
}

impl PoseClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("POSE_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            timeout: Duration::from_secs(
                std::env::var("POSE_SERVICE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            max_retries: std::env::var("POSE_SERVICE_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        }
    }
}

/// Client for the pose-estimation sidecar.
pub struct PoseClient {
    http: Client,
    config: PoseClientConfig,
}

impl PoseClient {
    /// Create a new pose client.
    pub fn new(config: PoseClientConfig) -> PoseResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PoseError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> PoseResult<Self> {
        Self::new(PoseClientConfig::from_env())
    }

    /// Check if the pose service is healthy.
    pub async fn health_check(&self) -> PoseResult<bool> {
        let url = format!("{}/health", self.config.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("Pose service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Pose service health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Run pose estimation on one encoded frame.
    ///
    /// Returns `None` when the model finds no person in the frame.
    pub async fn detect(&self, frame_jpeg: &[u8]) -> PoseResult<Option<PoseDetection>> {
        let url = format!("{}/pose", self.config.base_url);

        debug!(bytes = frame_jpeg.len(), "Sending frame to {}", url);

        let frame = frame_jpeg.to_vec();
        let response = self
            .with_retry(|| async {
                let part = Part::bytes(frame.clone())
                    .file_name("frame.jpg")
                    .mime_str("image/jpeg")
                    .map_err(PoseError::Network)?;
                let form = Form::new().part("frame", part);

                self.http
                    .post(&url)
                    .multipart(form)
                    .send()
                    .await
                    .map_err(PoseError::Network)
            })
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PoseError::RequestFailed(format!(
                "Pose service returned {}: {}",
                status, body
            )));
        }

        let pose: PoseResponse = response.json().await?;
        Ok(pose.into_detection())
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> PoseResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = PoseResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Pose request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(PoseError::RequestFailed("Unknown error".to_string())))
    }
}

#[async_trait]
impl PoseEstimator for PoseClient {
    async fn estimate(&self, frame_jpeg: &[u8]) -> PoseResult<Option<PoseDetection>> {
        self.detect(frame_jpeg).await
    }

    async fn health_check(&self) -> PoseResult<bool> {
        PoseClient::health_check(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PoseClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8001");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 2);
    }
}
