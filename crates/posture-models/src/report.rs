//! Full analysis report returned to callers.

use serde::{Deserialize, Serialize};

use crate::frame::FrameResult;
use crate::summary::Summary;

/// The complete result of analyzing one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: Summary,
    pub frames: Vec<FrameResult>,
    /// Path of the annotated output video, when overlay rendering ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_video_path: Option<String>,
}

impl AnalysisReport {
    pub fn new(summary: Summary, frames: Vec<FrameResult>) -> Self {
        Self {
            summary,
            frames,
            processed_video_path: None,
        }
    }

    pub fn with_processed_video(mut self, path: impl Into<String>) -> Self {
        self.processed_video_path = Some(path.into());
        self
    }
}
