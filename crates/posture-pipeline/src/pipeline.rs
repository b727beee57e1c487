//! Sequential frame analysis pipeline.
//!
//! One pipeline run is synchronous and stateless: download (for URL
//! input), decode frames, infer and evaluate each frame in order,
//! reduce to a summary, and optionally render the annotated video.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use posture_media::overlay::{FrameOverlay, OverlayStatus};
use posture_media::{download_to_temp, extract_frames, probe_video, render_overlay, transcode_for_playback};
use posture_models::{AnalysisReport, Classification, FrameResult, LandmarkSet, Summary};
use posture_pose::{PoseDetection, PoseError, PoseEstimator};

use crate::error::{PipelineError, PipelineResult};
use crate::evaluator::evaluate;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Render the annotated output video.
    pub render_overlay: bool,
    /// Directory for annotated output videos.
    pub output_dir: PathBuf,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            render_overlay: false,
            output_dir: PathBuf::from("uploads"),
        }
    }
}

/// The frame analysis pipeline.
pub struct AnalyzerPipeline {
    estimator: Arc<dyn PoseEstimator>,
    options: PipelineOptions,
}

impl AnalyzerPipeline {
    pub fn new(estimator: Arc<dyn PoseEstimator>, options: PipelineOptions) -> Self {
        Self { estimator, options }
    }

    /// Download a remote video and analyze it.
    ///
    /// The temp file is removed on every exit path.
    pub async fn analyze_url(&self, url: &str) -> PipelineResult<AnalysisReport> {
        let source = download_to_temp(url)
            .await
            .map_err(PipelineError::from_download)?;

        self.analyze_file(source.path()).await
    }

    /// Analyze a local video file.
    pub async fn analyze_file(&self, path: &Path) -> PipelineResult<AnalysisReport> {
        let info = probe_video(path).await.map_err(PipelineError::from_decode)?;
        info!(
            width = info.width,
            height = info.height,
            fps = info.fps,
            "Analyzing {}",
            path.display()
        );

        let frame_dir = tempfile::tempdir()?;
        let frame_paths = extract_frames(path, frame_dir.path())
            .await
            .map_err(PipelineError::from_decode)?;

        let mut frames = Vec::with_capacity(frame_paths.len());
        for (i, frame_path) in frame_paths.iter().enumerate() {
            let frame_index = i as u64 + 1;
            let jpeg = tokio::fs::read(frame_path).await?;
            let outcome = self.estimator.estimate(&jpeg).await;
            frames.push(classify_frame(frame_index, outcome));
        }

        let report = build_report(frames)?;
        info!(
            total = report.summary.total_frames,
            bad = report.summary.bad_posture_frames,
            "Frame analysis complete"
        );

        if !self.options.render_overlay {
            return Ok(report);
        }

        self.render_annotated(path, frame_dir.path(), report).await
    }

    /// Render the annotated video next to the finished report.
    ///
    /// Overlay and transcode failures surface as encode errors carrying
    /// the report; the analysis is never discarded.
    async fn render_annotated(
        &self,
        source: &Path,
        work_dir: &Path,
        report: AnalysisReport,
    ) -> PipelineResult<AnalysisReport> {
        let overlays: Vec<FrameOverlay> = report.frames.iter().map(frame_overlay).collect();

        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "video".to_string());
        let raw_output = work_dir.join(format!("processed_raw_{}.mp4", stem));
        let final_output = self.options.output_dir.join(format!("processed_{}.mp4", stem));

        if let Err(e) = tokio::fs::create_dir_all(&self.options.output_dir).await {
            return Err(encode_error(e.to_string(), report));
        }

        if let Err(e) = render_overlay(source, &raw_output, &overlays).await {
            warn!("Overlay rendering failed: {}", e);
            return Err(encode_error(e.to_string(), report));
        }

        if let Err(e) = transcode_for_playback(&raw_output, &final_output).await {
            warn!("Playback transcode failed: {}", e);
            return Err(encode_error(e.to_string(), report));
        }

        Ok(report.with_processed_video(final_output.to_string_lossy()))
    }
}

/// Classify one frame from the estimator outcome.
///
/// A per-frame model error downgrades only that frame; the run
/// continues.
pub fn classify_frame(
    frame_index: u64,
    outcome: Result<Option<PoseDetection>, PoseError>,
) -> FrameResult {
    match outcome {
        Ok(None) => FrameResult::no_person(frame_index),
        Ok(Some(detection)) => match LandmarkSet::from_points(&detection.landmarks) {
            Ok(set) => {
                let eval = evaluate(&set);
                FrameResult::new(frame_index, eval.classification, eval.reasons)
            }
            Err(e) => FrameResult::indeterminate(frame_index, e.to_string()),
        },
        Err(e) => FrameResult::indeterminate(
            frame_index,
            format!("Landmark processing error: {}", e),
        ),
    }
}

/// Reduce the frame results to a report.
///
/// Indeterminate frames never count as bad. An empty run is an
/// explicit decode error, never a division fault.
pub fn build_report(frames: Vec<FrameResult>) -> PipelineResult<AnalysisReport> {
    let bad = frames
        .iter()
        .filter(|f| f.classification.is_bad())
        .count() as u64;

    let summary = Summary::from_counts(frames.len() as u64, bad)
        .map_err(|e| PipelineError::Decode(e.to_string()))?;

    Ok(AnalysisReport::new(summary, frames))
}

fn frame_overlay(frame: &FrameResult) -> FrameOverlay {
    let status = match frame.classification {
        Classification::Good => OverlayStatus::Good,
        Classification::Bad => OverlayStatus::Bad,
        Classification::Indeterminate => OverlayStatus::NoPerson,
    };

    FrameOverlay {
        frame_index: frame.frame_index,
        status,
        reasons: frame.reasons.clone(),
    }
}

fn encode_error(message: String, report: AnalysisReport) -> PipelineError {
    PipelineError::Encode {
        message,
        report: Box::new(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posture_models::Landmark;

    /// 33 landmarks positioning an upright figure at the indices the
    /// extraction reads.
    fn upright_points() -> Vec<Landmark> {
        let mut points = vec![Landmark::new(0.0, 0.0); 33];
        for side in [0usize, 1] {
            points[11 + side] = Landmark::new(0.5, 0.3); // shoulders
            points[23 + side] = Landmark::new(0.5, 0.5); // hips
            points[25 + side] = Landmark::new(0.5, 0.7); // knees
            points[27 + side] = Landmark::new(0.5, 0.9); // ankles
            points[7 + side] = Landmark::new(0.6, 0.3); // ears
        }
        points
    }

    /// Same figure with the shoulders pitched forward of the hips.
    fn slouched_points() -> Vec<Landmark> {
        let mut points = upright_points();
        points[11] = Landmark::new(0.65, 0.36);
        points[12] = Landmark::new(0.65, 0.36);
        // Keep the ears level with the new shoulder position
        points[7] = Landmark::new(0.75, 0.36);
        points[8] = Landmark::new(0.75, 0.36);
        points
    }

    fn detection(points: Vec<Landmark>) -> Result<Option<PoseDetection>, PoseError> {
        Ok(Some(PoseDetection { landmarks: points }))
    }

    #[test]
    fn test_classify_upright_frame() {
        let result = classify_frame(1, detection(upright_points()));
        assert_eq!(result.classification, Classification::Good);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_classify_no_person() {
        let result = classify_frame(2, Ok(None));
        assert_eq!(result.classification, Classification::Indeterminate);
        assert_eq!(result.reasons, vec!["No person detected"]);
    }

    #[test]
    fn test_classify_short_landmark_list() {
        let result = classify_frame(3, detection(vec![Landmark::new(0.5, 0.5); 10]));
        assert_eq!(result.classification, Classification::Indeterminate);
        assert!(result.reasons[0].contains("got 10"));
    }

    #[test]
    fn test_classify_model_error_downgrades_frame() {
        let outcome = Err(PoseError::RequestFailed("inference blew up".to_string()));
        let result = classify_frame(4, outcome);
        assert_eq!(result.classification, Classification::Indeterminate);
        assert!(result.reasons[0].contains("Landmark processing error"));
        assert!(result.reasons[0].contains("inference blew up"));
    }

    #[test]
    fn test_empty_run_is_explicit_error() {
        let err = build_report(vec![]).unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
        assert!(err.to_string().contains("No frames could be read"));
    }

    #[test]
    fn test_three_frame_run() {
        // Frame 1: no detection, frame 2: upright, frame 3: slouched
        let frames = vec![
            classify_frame(1, Ok(None)),
            classify_frame(2, detection(upright_points())),
            classify_frame(3, detection(slouched_points())),
        ];

        assert_eq!(frames[2].classification, Classification::Bad);

        let report = build_report(frames).unwrap();
        assert_eq!(report.summary.total_frames, 3);
        // The undetected frame is excluded from the bad count
        assert_eq!(report.summary.bad_posture_frames, 1);
        assert_eq!(report.summary.good_posture_percentage, 66.67);
        assert!(report.processed_video_path.is_none());
    }

    #[test]
    fn test_encode_failure_carries_finished_report() {
        let frames = vec![
            classify_frame(1, detection(upright_points())),
            classify_frame(2, detection(slouched_points())),
        ];
        let report = build_report(frames).unwrap();

        let err = encode_error("ffmpeg exited with code 1".to_string(), report.clone());
        assert_eq!(
            err.to_string(),
            "FFmpeg re-encoding failed: ffmpeg exited with code 1"
        );

        // Callers recover the full analysis from the error itself
        match err {
            PipelineError::Encode { report: kept, .. } => {
                assert_eq!(*kept, report);
                assert_eq!(kept.summary.total_frames, 2);
                assert_eq!(kept.summary.bad_posture_frames, 1);
            }
            other => panic!("expected encode error, got {}", other),
        }
    }

    #[test]
    fn test_overlay_status_mapping() {
        let overlay = frame_overlay(&FrameResult::no_person(7));
        assert_eq!(overlay.frame_index, 7);
        assert_eq!(overlay.status, OverlayStatus::NoPerson);

        let overlay = frame_overlay(&FrameResult::new(
            8,
            Classification::Bad,
            vec!["Knee exceeds ankle position".to_string()],
        ));
        assert_eq!(overlay.status, OverlayStatus::Bad);
        assert_eq!(overlay.reasons.len(), 1);
    }
}
