//! Pose landmarks in normalized image coordinates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A normalized 2-D body keypoint (0.0 to 1.0) from the pose model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// X coordinate (0.0 = left, 1.0 = right)
    pub x: f64,
    /// Y coordinate (0.0 = top, 1.0 = bottom)
    pub y: f64,
    /// Detection confidence, when the model reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    /// Create a new landmark.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            visibility: None,
        }
    }

    /// Check if the landmark is within the normalized frame.
    pub fn is_valid(&self) -> bool {
        // Allow small epsilon for float precision
        self.x >= -0.001 && self.x <= 1.001 && self.y >= -0.001 && self.y <= 1.001
    }
}

/// MediaPipe Pose landmark indices for the points the rules need.
pub mod index {
    pub const LEFT_EAR: usize = 7;
    pub const RIGHT_EAR: usize = 8;
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_HIP: usize = 23;
    pub const RIGHT_HIP: usize = 24;
    pub const LEFT_KNEE: usize = 25;
    pub const RIGHT_KNEE: usize = 26;
    pub const LEFT_ANKLE: usize = 27;
    pub const RIGHT_ANKLE: usize = 28;
}

/// Highest index the extraction reads; the model list must extend past it.
const MAX_INDEX: usize = index::RIGHT_ANKLE;

/// Errors extracting the named landmark set from a model result.
#[derive(Debug, Error)]
pub enum LandmarkError {
    #[error("Landmark processing error: expected at least {expected} landmarks, got {actual}")]
    TooFewLandmarks { expected: usize, actual: usize },
}

/// The ten named landmarks the posture rules evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    pub left_shoulder: Landmark,
    pub right_shoulder: Landmark,
    pub left_hip: Landmark,
    pub right_hip: Landmark,
    pub left_knee: Landmark,
    pub right_knee: Landmark,
    pub left_ankle: Landmark,
    pub right_ankle: Landmark,
    pub left_ear: Landmark,
    pub right_ear: Landmark,
}

impl LandmarkSet {
    /// Extract the named set from a full model landmark list.
    pub fn from_points(points: &[Landmark]) -> Result<Self, LandmarkError> {
        if points.len() <= MAX_INDEX {
            return Err(LandmarkError::TooFewLandmarks {
                expected: MAX_INDEX + 1,
                actual: points.len(),
            });
        }

        Ok(Self {
            left_shoulder: points[index::LEFT_SHOULDER],
            right_shoulder: points[index::RIGHT_SHOULDER],
            left_hip: points[index::LEFT_HIP],
            right_hip: points[index::RIGHT_HIP],
            left_knee: points[index::LEFT_KNEE],
            right_knee: points[index::RIGHT_KNEE],
            left_ankle: points[index::LEFT_ANKLE],
            right_ankle: points[index::RIGHT_ANKLE],
            left_ear: points[index::LEFT_EAR],
            right_ear: points[index::RIGHT_EAR],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_list() -> Vec<Landmark> {
        (0..33)
            .map(|i| Landmark::new(i as f64 / 100.0, i as f64 / 100.0))
            .collect()
    }

    #[test]
    fn test_extract_from_full_list() {
        let set = LandmarkSet::from_points(&full_list()).unwrap();
        assert_eq!(set.left_shoulder.x, 0.11);
        assert_eq!(set.right_ankle.x, 0.28);
        assert_eq!(set.left_ear.x, 0.07);
    }

    #[test]
    fn test_extract_too_few_points() {
        let points: Vec<Landmark> = full_list().into_iter().take(20).collect();
        let err = LandmarkSet::from_points(&points).unwrap_err();
        assert!(err.to_string().contains("expected at least 29"));
        assert!(err.to_string().contains("got 20"));
    }

    #[test]
    fn test_landmark_validity() {
        assert!(Landmark::new(0.5, 0.5).is_valid());
        assert!(Landmark::new(0.0, 1.0).is_valid());
        assert!(!Landmark::new(1.2, 0.5).is_valid());
    }
}
