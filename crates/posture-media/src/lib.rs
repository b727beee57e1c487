//! FFmpeg CLI wrapper for the posture analysis backend.
//!
//! Video decode and encode are external collaborators: this crate
//! shells out to `ffmpeg`/`ffprobe` for frame extraction, overlay
//! rendering and the final playback transcode, and downloads remote
//! source videos over HTTP.

pub mod command;
pub mod download;
pub mod error;
pub mod frames;
pub mod overlay;
pub mod probe;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use download::download_to_temp;
pub use error::{MediaError, MediaResult};
pub use frames::extract_frames;
pub use overlay::{render_overlay, transcode_for_playback, FrameOverlay, OverlayStatus};
pub use probe::{probe_video, VideoInfo};
