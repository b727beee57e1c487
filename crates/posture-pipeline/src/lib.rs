//! Posture analysis pipeline.
//!
//! This crate provides:
//! - The landmark evaluator: fixed geometric threshold rules turning
//!   one frame's landmarks into a classification plus reasons
//! - The frame pipeline: download, decode, per-frame inference,
//!   accumulation, and optional overlay rendering

pub mod error;
pub mod evaluator;
pub mod pipeline;

pub use error::{PipelineError, PipelineResult};
pub use evaluator::{evaluate, Evaluation, Measurements};
pub use pipeline::{AnalyzerPipeline, PipelineOptions};
