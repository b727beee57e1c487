//! Application state.

use std::sync::Arc;

use posture_pipeline::{AnalyzerPipeline, PipelineOptions};
use posture_pose::{PoseClient, PoseEstimator};

use crate::config::ApiConfig;

/// Shared application state.
///
/// Requests are independent and stateless; the state only carries
/// configuration and the shared estimator handle.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub estimator: Arc<dyn PoseEstimator>,
}

impl AppState {
    /// Create application state with the production pose client.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let estimator = Arc::new(PoseClient::from_env()?);
        Ok(Self { config, estimator })
    }

    /// Create application state with a custom estimator (tests).
    pub fn with_estimator(config: ApiConfig, estimator: Arc<dyn PoseEstimator>) -> Self {
        Self { config, estimator }
    }

    /// Build a pipeline for one request.
    pub fn pipeline(&self) -> AnalyzerPipeline {
        AnalyzerPipeline::new(
            Arc::clone(&self.estimator),
            PipelineOptions {
                render_overlay: self.config.render_overlay,
                output_dir: self.config.output_dir.clone(),
            },
        )
    }
}
