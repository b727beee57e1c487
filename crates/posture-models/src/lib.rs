//! Shared data models for the posture analysis backend.
//!
//! This crate provides Serde-serializable types for:
//! - Pose landmarks and the named landmark set used by the rules
//! - Per-frame classification results
//! - Run summaries and the analysis report envelope

pub mod frame;
pub mod landmark;
pub mod report;
pub mod summary;

// Re-export common types
pub use frame::{Classification, FrameResult};
pub use landmark::{Landmark, LandmarkError, LandmarkSet};
pub use report::AnalysisReport;
pub use summary::{Summary, SummaryError};
