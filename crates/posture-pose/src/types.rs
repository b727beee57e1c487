//! Pose service request/response types.

use serde::{Deserialize, Serialize};

use posture_models::Landmark;

/// Landmarks detected for a single frame.
///
/// The list follows MediaPipe Pose ordering; callers index into it
/// with the constants in `posture_models::landmark::index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseDetection {
    pub landmarks: Vec<Landmark>,
}

/// Response from `POST /pose`.
///
/// `landmarks` is `null` (or absent) when no person was detected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseResponse {
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}

impl PoseResponse {
    /// Convert into the detection, if a person was found.
    pub fn into_detection(self) -> Option<PoseDetection> {
        self.landmarks
            .filter(|l| !l.is_empty())
            .map(|landmarks| PoseDetection { landmarks })
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_landmarks_means_no_person() {
        let response: PoseResponse = serde_json::from_str(r#"{"landmarks": null}"#).unwrap();
        assert!(response.into_detection().is_none());

        let response: PoseResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_detection().is_none());

        let response: PoseResponse = serde_json::from_str(r#"{"landmarks": []}"#).unwrap();
        assert!(response.into_detection().is_none());
    }

    #[test]
    fn test_landmarks_parsed() {
        let response: PoseResponse =
            serde_json::from_str(r#"{"landmarks": [{"x": 0.5, "y": 0.25, "visibility": 0.9}]}"#)
                .unwrap();
        let detection = response.into_detection().unwrap();
        assert_eq!(detection.landmarks.len(), 1);
        assert_eq!(detection.landmarks[0].x, 0.5);
        assert_eq!(detection.landmarks[0].visibility, Some(0.9));
    }
}
