//! Client for the pose-estimation sidecar service.
//!
//! Pose detection is delegated to an external model served over HTTP.
//! This crate provides the request/response types, a reqwest-based
//! client with retry, and the [`PoseEstimator`] trait the pipeline
//! programs against.

pub mod client;
pub mod error;
pub mod estimator;
pub mod types;

pub use client::{PoseClient, PoseClientConfig};
pub use error::{PoseError, PoseResult};
pub use estimator::PoseEstimator;
pub use types::{PoseDetection, PoseResponse};
