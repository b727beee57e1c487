//! Pipeline error types.

use posture_media::MediaError;
use posture_models::AnalysisReport;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Download(String),

    #[error("{0}")]
    Decode(String),

    /// The output video could not be encoded. Analysis had already
    /// completed; the finished report travels with the error so
    /// callers can still recover it.
    #[error("FFmpeg re-encoding failed: {message}")]
    Encode {
        message: String,
        report: Box<AnalysisReport>,
    },

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Classify a media error raised while acquiring the source video.
    pub(crate) fn from_download(err: MediaError) -> Self {
        match err {
            MediaError::DownloadFailed { message } => Self::Download(message),
            other => Self::Media(other),
        }
    }

    /// Classify a media error raised while opening or decoding.
    pub(crate) fn from_decode(err: MediaError) -> Self {
        match err {
            MediaError::FfmpegFailed { message, .. }
            | MediaError::FfprobeFailed { message, .. } => Self::Decode(message),
            MediaError::InvalidVideo(message) => Self::Decode(message),
            MediaError::FileNotFound(path) => {
                Self::Decode(format!("Cannot open video file: {}", path.display()))
            }
            other => Self::Media(other),
        }
    }
}
