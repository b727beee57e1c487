//! Frame extraction via the FFmpeg image2 muxer.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Extract every frame of `input` as numbered JPEGs into `dir`.
///
/// Returns the frame paths in playback order. An input FFmpeg cannot
/// open, or one that yields zero frames, is a decode failure.
pub async fn extract_frames(input: impl AsRef<Path>, dir: impl AsRef<Path>) -> MediaResult<Vec<PathBuf>> {
    let input = input.as_ref();
    let dir = dir.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    tokio::fs::create_dir_all(dir).await?;
    let pattern = dir.join("frame_%06d.jpg");

    let cmd = FfmpegCommand::new(input, &pattern).qscale(2);
    FfmpegRunner::new()
        .run(&cmd)
        .await
        .map_err(|e| match e {
            MediaError::FfmpegFailed { stderr, exit_code, .. } => MediaError::FfmpegFailed {
                message: format!("Failed to open video: {}", input.display()),
                stderr,
                exit_code,
            },
            other => other,
        })?;

    let mut frames = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "jpg") {
            frames.push(path);
        }
    }
    // image2 names are zero padded, lexicographic order is frame order
    frames.sort();

    debug!(count = frames.len(), "Extracted frames from {}", input.display());

    if frames.is_empty() {
        return Err(MediaError::InvalidVideo(
            "No frames could be read from video".to_string(),
        ));
    }

    Ok(frames)
}
