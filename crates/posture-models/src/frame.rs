//! Per-frame classification results.

use serde::{Deserialize, Serialize};

/// Verdict for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// All posture rules passed.
    Good,
    /// At least one posture rule fired.
    Bad,
    /// No person detected, or the landmarks could not be extracted.
    Indeterminate,
}

impl Classification {
    /// Whether this frame counts toward the bad-frame total.
    pub fn is_bad(&self) -> bool {
        matches!(self, Classification::Bad)
    }
}

/// Result for one processed frame. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    /// 1-based frame number within the video.
    pub frame_index: u64,
    pub classification: Classification,
    /// Human-readable reasons, in rule evaluation order.
    pub reasons: Vec<String>,
}

impl FrameResult {
    pub fn new(frame_index: u64, classification: Classification, reasons: Vec<String>) -> Self {
        Self {
            frame_index,
            classification,
            reasons,
        }
    }

    /// A frame for which the model found no person.
    pub fn no_person(frame_index: u64) -> Self {
        Self::new(
            frame_index,
            Classification::Indeterminate,
            vec!["No person detected".to_string()],
        )
    }

    /// A frame that failed during landmark extraction or inference.
    pub fn indeterminate(frame_index: u64, reason: impl Into<String>) -> Self {
        Self::new(frame_index, Classification::Indeterminate, vec![reason.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_serde() {
        assert_eq!(
            serde_json::to_string(&Classification::Good).unwrap(),
            "\"good\""
        );
        assert_eq!(
            serde_json::to_string(&Classification::Indeterminate).unwrap(),
            "\"indeterminate\""
        );
        let parsed: Classification = serde_json::from_str("\"bad\"").unwrap();
        assert_eq!(parsed, Classification::Bad);
    }

    #[test]
    fn test_no_person_is_not_bad() {
        let frame = FrameResult::no_person(4);
        assert_eq!(frame.frame_index, 4);
        assert!(!frame.classification.is_bad());
        assert_eq!(frame.reasons, vec!["No person detected"]);
    }
}
