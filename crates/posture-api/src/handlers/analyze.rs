//! Posture analysis handler.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use posture_models::AnalysisReport;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

/// Analysis request body.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// URL of the video to analyze.
    pub video_url: Option<String>,
}

/// Analysis response envelope.
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub feedback: AnalysisReport,
}

/// Analyze a remote video.
///
/// The whole run executes before the response is sent; there are no
/// partial results.
pub async fn analyze(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let video_url = request
        .video_url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing video_url"))?;

    info!(video_url = %video_url, "Starting posture analysis");

    let report = state.pipeline().analyze_url(&video_url).await?;

    info!(
        total_frames = report.summary.total_frames,
        bad_frames = report.summary.bad_posture_frames,
        "Posture analysis complete"
    );

    Ok(Json(AnalyzeResponse { feedback: report }))
}
