//! Source video download over HTTP.

use futures_util::StreamExt;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Download a remote video to a temporary file.
///
/// The returned [`NamedTempFile`] deletes itself when dropped, so the
/// download is cleaned up on every exit path of the caller.
pub async fn download_to_temp(url: &str) -> MediaResult<NamedTempFile> {
    info!("Downloading source video from {}", url);

    let response = reqwest::get(url)
        .await
        .map_err(|e| MediaError::download_failed(format!("Could not download video: {}", e)))?;

    if !response.status().is_success() {
        return Err(MediaError::download_failed(format!(
            "Could not download video: HTTP {}",
            response.status()
        )));
    }

    let temp = NamedTempFile::with_suffix(".mp4")?;
    let mut file = tokio::fs::File::create(temp.path()).await?;

    let mut stream = response.bytes_stream();
    let mut total: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk
            .map_err(|e| MediaError::download_failed(format!("Could not download video: {}", e)))?;
        total += chunk.len() as u64;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    debug!(bytes = total, path = %temp.path().display(), "Download complete");

    if total == 0 {
        return Err(MediaError::download_failed(
            "Could not download video: empty response body",
        ));
    }

    Ok(temp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_download_failure() {
        // Reserved TLD, guaranteed not to resolve
        let err = download_to_temp("http://pose.invalid/video.mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::DownloadFailed { .. }));
        assert!(err.to_string().contains("Could not download video"));
    }
}
