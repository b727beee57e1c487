//! Aggregate statistics over one analysis run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors computing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("No frames could be read from video")]
    NoFrames,
}

/// Aggregate posture statistics for a whole video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_frames: u64,
    pub bad_posture_frames: u64,
    /// Percentage of frames not flagged bad, rounded to 2 decimals.
    pub good_posture_percentage: f64,
}

impl Summary {
    /// Compute the summary from the run counters.
    ///
    /// Fails explicitly for an empty run rather than dividing by zero.
    pub fn from_counts(total_frames: u64, bad_posture_frames: u64) -> Result<Self, SummaryError> {
        if total_frames == 0 {
            return Err(SummaryError::NoFrames);
        }

        let good = (total_frames - bad_posture_frames) as f64;
        let percentage = good / total_frames as f64 * 100.0;

        Ok(Self {
            total_frames,
            bad_posture_frames,
            good_posture_percentage: round2(percentage),
        })
    }
}

/// Round to 2 decimals, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_frames_is_an_error() {
        let err = Summary::from_counts(0, 0).unwrap_err();
        assert!(matches!(err, SummaryError::NoFrames));
        assert_eq!(err.to_string(), "No frames could be read from video");
    }

    #[test]
    fn test_all_good() {
        let summary = Summary::from_counts(10, 0).unwrap();
        assert_eq!(summary.good_posture_percentage, 100.0);
    }

    #[test]
    fn test_two_thirds_good_rounds_to_66_67() {
        let summary = Summary::from_counts(3, 1).unwrap();
        assert_eq!(summary.total_frames, 3);
        assert_eq!(summary.bad_posture_frames, 1);
        assert_eq!(summary.good_posture_percentage, 66.67);
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        // 1 good frame out of 16 = 6.25%, exact two decimals
        assert_eq!(Summary::from_counts(16, 15).unwrap().good_posture_percentage, 6.25);
        // 5/6 good = 83.333... -> 83.33
        assert_eq!(Summary::from_counts(6, 1).unwrap().good_posture_percentage, 83.33);
        // 1/6 good = 16.666... -> 16.67
        assert_eq!(Summary::from_counts(6, 5).unwrap().good_posture_percentage, 16.67);
    }
}
