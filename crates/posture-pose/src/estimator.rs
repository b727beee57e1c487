//! The estimator seam between the pipeline and the model service.

use async_trait::async_trait;

use crate::error::PoseResult;
use crate::types::PoseDetection;

/// Per-frame pose estimation.
///
/// The production implementation is [`crate::PoseClient`]; tests drive
/// the pipeline with scripted implementations.
#[async_trait]
pub trait PoseEstimator: Send + Sync {
    /// Estimate the pose in one JPEG-encoded frame.
    ///
    /// `Ok(None)` means the model found no person.
    async fn estimate(&self, frame_jpeg: &[u8]) -> PoseResult<Option<PoseDetection>>;

    /// Whether the backing model is reachable and ready to serve.
    ///
    /// In-process implementations are always ready.
    async fn health_check(&self) -> PoseResult<bool> {
        Ok(true)
    }
}
