//! Feedback overlay rendering.
//!
//! Overlays are burned in with FFmpeg drawbox/drawtext filters, one
//! group per frame gated by `enable='eq(n,<index>)'`. The chain is
//! written to a filter script file so long videos do not overflow the
//! command line.

use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Visual status of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayStatus {
    Good,
    Bad,
    NoPerson,
}

impl OverlayStatus {
    fn label(&self) -> &'static str {
        match self {
            OverlayStatus::Good => "Good Posture",
            OverlayStatus::Bad => "BAD POSTURE DETECTED",
            OverlayStatus::NoPerson => "No Person Detected",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            OverlayStatus::Good => "lime",
            OverlayStatus::Bad => "red",
            OverlayStatus::NoPerson => "yellow",
        }
    }
}

/// Overlay content for one frame.
#[derive(Debug, Clone)]
pub struct FrameOverlay {
    /// 1-based frame number shown in the banner.
    pub frame_index: u64,
    pub status: OverlayStatus,
    /// Reason bullets, drawn only for bad frames.
    pub reasons: Vec<String>,
}

/// Escape a string for use inside a drawtext `text='...'` value.
fn escape_drawtext(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '\'' | ':' | '%' | ',' | '[' | ']' | ';' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build the filter chain for a single frame.
///
/// `filter_frame` is the 0-based index FFmpeg's `n` variable counts.
fn build_frame_filter(filter_frame: u64, overlay: &FrameOverlay) -> String {
    let enable = format!("enable='eq(n,{})'", filter_frame);
    let mut parts = Vec::new();

    // Banner backdrop
    parts.push(format!(
        "drawbox=x=10:y=10:w=iw-20:h=140:color=black@0.7:t=fill:{}",
        enable
    ));

    // Frame number
    parts.push(format!(
        "drawtext=text='Frame\\: {}':x=20:y=25:fontsize=24:fontcolor=white:{}",
        overlay.frame_index, enable
    ));

    // Status line
    parts.push(format!(
        "drawtext=text='{}':x=20:y=58:fontsize=28:fontcolor={}:{}",
        escape_drawtext(overlay.status.label()),
        overlay.status.color(),
        enable
    ));

    // Reason bullets, bad frames only
    if overlay.status == OverlayStatus::Bad {
        for (i, reason) in overlay.reasons.iter().enumerate() {
            let y = 95 + i as u64 * 25;
            parts.push(format!(
                "drawtext=text='- {}':x=20:y={}:fontsize=18:fontcolor=red:{}",
                escape_drawtext(reason),
                y,
                enable
            ));
        }
    }

    parts.join(",")
}

/// Build the complete overlay filter chain for a video.
pub fn build_overlay_filter(overlays: &[FrameOverlay]) -> String {
    if overlays.is_empty() {
        return "null".to_string();
    }

    overlays
        .iter()
        .enumerate()
        .map(|(i, overlay)| build_frame_filter(i as u64, overlay))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render the overlay onto `input`, producing an intermediate file.
///
/// The intermediate uses mpeg4 like the raw analyzer output; callers
/// run [`transcode_for_playback`] afterwards for a browser-safe file.
pub async fn render_overlay(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    overlays: &[FrameOverlay],
) -> MediaResult<()> {
    let script = NamedTempFile::with_suffix(".filters")?;
    tokio::fs::write(script.path(), build_overlay_filter(overlays)).await?;

    info!(
        frames = overlays.len(),
        "Rendering overlay to {}",
        output.as_ref().display()
    );

    let cmd = FfmpegCommand::new(input.as_ref(), output.as_ref())
        .video_filter_script(script.path())
        .video_codec("mpeg4")
        .qscale(3)
        .output_arg("-an");

    FfmpegRunner::new().run(&cmd).await
}

/// Re-encode for playback compatibility (H.264 + AAC).
///
/// Kept separate from overlay rendering so encode failures stay
/// distinguishable from analysis failures.
pub async fn transcode_for_playback(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    info!("Transcoding {} for playback", output.as_ref().display());

    let cmd = FfmpegCommand::new(input, output.as_ref())
        .video_codec("libx264")
        .audio_codec("aac")
        .pixel_format("yuv420p");

    FfmpegRunner::new().run(&cmd).await.map_err(|e| match e {
        MediaError::FfmpegFailed { stderr, exit_code, .. } => MediaError::FfmpegFailed {
            message: "FFmpeg re-encoding failed".to_string(),
            stderr,
            exit_code,
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bad_overlay() -> FrameOverlay {
        FrameOverlay {
            frame_index: 3,
            status: OverlayStatus::Bad,
            reasons: vec!["Severe back bend (140°)".to_string()],
        }
    }

    #[test]
    fn test_escape_drawtext() {
        assert_eq!(escape_drawtext("plain"), "plain");
        assert_eq!(
            escape_drawtext("Neck angle too steep (35°)"),
            "Neck angle too steep (35°)"
        );
        assert_eq!(escape_drawtext("a:b,c"), "a\\:b\\,c");
        assert_eq!(escape_drawtext("100%"), "100\\%");
    }

    #[test]
    fn test_frame_filter_gated_by_frame_number() {
        let filter = build_frame_filter(2, &bad_overlay());
        assert!(filter.contains("enable='eq(n,2)'"));
        assert!(filter.contains("drawbox"));
        assert!(filter.contains("text='Frame\\: 3'"));
        assert!(filter.contains("BAD POSTURE DETECTED"));
        assert!(filter.contains("Severe back bend"));
    }

    #[test]
    fn test_good_frame_has_no_reason_bullets() {
        let overlay = FrameOverlay {
            frame_index: 1,
            status: OverlayStatus::Good,
            reasons: vec![],
        };
        let filter = build_frame_filter(0, &overlay);
        assert!(filter.contains("Good Posture"));
        assert!(filter.contains("fontcolor=lime"));
        assert!(!filter.contains("- "));
    }

    #[test]
    fn test_no_person_frame_is_yellow() {
        let overlay = FrameOverlay {
            frame_index: 1,
            status: OverlayStatus::NoPerson,
            // Informational only; never drawn as bullets
            reasons: vec!["No person detected".to_string()],
        };
        let filter = build_frame_filter(0, &overlay);
        assert!(filter.contains("No Person Detected"));
        assert!(filter.contains("fontcolor=yellow"));
        assert!(!filter.contains("text='- "));
    }

    #[test]
    fn test_empty_chain_is_null_filter() {
        assert_eq!(build_overlay_filter(&[]), "null");
    }

    #[test]
    fn test_chain_covers_all_frames() {
        let overlays = vec![bad_overlay(), bad_overlay(), bad_overlay()];
        let filter = build_overlay_filter(&overlays);
        assert!(filter.contains("eq(n,0)"));
        assert!(filter.contains("eq(n,1)"));
        assert!(filter.contains("eq(n,2)"));
    }
}
