//! Landmark evaluator: fixed geometric threshold rules.
//!
//! Evaluation is deterministic and side-effect free. Thresholds are
//! static; there is no tunability surface.

use posture_models::{Classification, Landmark, LandmarkSet};

/// Back angles below this are a severe bend.
const SEVERE_BACK_ANGLE: f64 = 150.0;
/// Back angles below this (but not severe) are still flagged.
const MIN_BACK_ANGLE: f64 = 160.0;
/// How far the knee may sit ahead of the ankle on the x axis.
const KNEE_FORWARD_THRESHOLD: f64 = 0.05;
/// Neck angles above this are flagged.
const MAX_NECK_ANGLE: f64 = 30.0;

/// Verdict plus human-readable reasons for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub classification: Classification,
    pub reasons: Vec<String>,
}

/// The three derived quantities the rules threshold on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    /// Interior hip angle (shoulder-hip-knee), averaged over both sides.
    pub back_angle: f64,
    /// Ear-shoulder angle from horizontal, averaged over both sides.
    pub neck_angle: f64,
    /// Whether either knee sits ahead of its ankle.
    pub knee_forward: bool,
}

/// Angle ABC in degrees where `b` is the joint.
fn joint_angle(a: &Landmark, b: &Landmark, c: &Landmark) -> f64 {
    let angle = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    angle.to_degrees().abs()
}

/// Angle of the neck with respect to horizontal.
fn neck_angle(shoulder: &Landmark, ear: &Landmark) -> f64 {
    let dx = ear.x - shoulder.x;
    let dy = ear.y - shoulder.y;
    dy.atan2(dx).to_degrees().abs()
}

/// Knee ahead of the ankle on the x axis (indicative of bad squatting).
///
/// Assumes a fixed camera orientation; mirrored or rotated input is a
/// known limitation.
fn is_knee_forward_of_ankle(knee: &Landmark, ankle: &Landmark) -> bool {
    (knee.x - ankle.x) > KNEE_FORWARD_THRESHOLD
}

impl Measurements {
    /// Derive the measurements from one frame's landmarks.
    pub fn from_landmarks(set: &LandmarkSet) -> Self {
        let back_angle = (joint_angle(&set.left_shoulder, &set.left_hip, &set.left_knee)
            + joint_angle(&set.right_shoulder, &set.right_hip, &set.right_knee))
            / 2.0;

        let neck = (neck_angle(&set.left_shoulder, &set.left_ear)
            + neck_angle(&set.right_shoulder, &set.right_ear))
            / 2.0;

        let knee_forward = is_knee_forward_of_ankle(&set.left_knee, &set.left_ankle)
            || is_knee_forward_of_ankle(&set.right_knee, &set.right_ankle);

        Self {
            back_angle,
            neck_angle: neck,
            knee_forward,
        }
    }

    /// Apply the threshold rules.
    ///
    /// Rules are independent; every reason that applies is collected,
    /// in rule order. Degree values are truncated toward zero.
    pub fn evaluate(&self) -> Evaluation {
        let mut reasons = Vec::new();

        if self.back_angle < SEVERE_BACK_ANGLE {
            reasons.push(format!("Severe back bend ({}°)", self.back_angle as i64));
        } else if self.back_angle < MIN_BACK_ANGLE {
            reasons.push(format!(
                "Back not straight enough ({}°)",
                self.back_angle as i64
            ));
        }

        if self.knee_forward {
            reasons.push("Knee exceeds ankle position".to_string());
        }

        if self.neck_angle > MAX_NECK_ANGLE {
            reasons.push(format!("Neck angle too steep ({}°)", self.neck_angle as i64));
        }

        let classification = if reasons.is_empty() {
            Classification::Good
        } else {
            Classification::Bad
        };

        Evaluation {
            classification,
            reasons,
        }
    }
}

/// Evaluate one frame's landmarks against the posture rules.
pub fn evaluate(set: &LandmarkSet) -> Evaluation {
    Measurements::from_landmarks(set).evaluate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upright() -> Measurements {
        Measurements {
            back_angle: 180.0,
            neck_angle: 0.0,
            knee_forward: false,
        }
    }

    /// A symmetric, fully upright figure: straight vertical back,
    /// knees over ankles, ears level with the shoulders.
    fn upright_set() -> LandmarkSet {
        let shoulder = Landmark::new(0.5, 0.3);
        let hip = Landmark::new(0.5, 0.5);
        let knee = Landmark::new(0.5, 0.7);
        let ankle = Landmark::new(0.5, 0.9);
        let ear = Landmark::new(0.6, 0.3);

        LandmarkSet {
            left_shoulder: shoulder,
            right_shoulder: shoulder,
            left_hip: hip,
            right_hip: hip,
            left_knee: knee,
            right_knee: knee,
            left_ankle: ankle,
            right_ankle: ankle,
            left_ear: ear,
            right_ear: ear,
        }
    }

    #[test]
    fn test_upright_measurements() {
        let m = Measurements::from_landmarks(&upright_set());
        assert!((m.back_angle - 180.0).abs() < 1e-9);
        assert!(m.neck_angle.abs() < 1e-9);
        assert!(!m.knee_forward);
    }

    #[test]
    fn test_upright_is_good_with_no_reasons() {
        let eval = evaluate(&upright_set());
        assert_eq!(eval.classification, Classification::Good);
        assert!(eval.reasons.is_empty());
    }

    #[test]
    fn test_severe_back_bend() {
        let eval = Measurements {
            back_angle: 149.9,
            ..upright()
        }
        .evaluate();
        assert_eq!(eval.classification, Classification::Bad);
        assert_eq!(eval.reasons, vec!["Severe back bend (149°)"]);
    }

    #[test]
    fn test_moderate_back_bend() {
        let eval = Measurements {
            back_angle: 155.0,
            ..upright()
        }
        .evaluate();
        assert_eq!(eval.classification, Classification::Bad);
        assert_eq!(eval.reasons, vec!["Back not straight enough (155°)"]);
    }

    #[test]
    fn test_back_angle_boundary_is_good() {
        // The rule is strict <; exactly 160 passes
        let eval = Measurements {
            back_angle: 160.0,
            ..upright()
        }
        .evaluate();
        assert_eq!(eval.classification, Classification::Good);
        assert!(eval.reasons.is_empty());
    }

    #[test]
    fn test_severe_boundary_prefers_severe_reason() {
        let eval = Measurements {
            back_angle: 149.0,
            ..upright()
        }
        .evaluate();
        assert_eq!(eval.reasons, vec!["Severe back bend (149°)"]);

        let eval = Measurements {
            back_angle: 150.0,
            ..upright()
        }
        .evaluate();
        assert_eq!(eval.reasons, vec!["Back not straight enough (150°)"]);
    }

    #[test]
    fn test_degree_values_truncate_toward_zero() {
        let eval = Measurements {
            back_angle: 155.999,
            ..upright()
        }
        .evaluate();
        assert_eq!(eval.reasons, vec!["Back not straight enough (155°)"]);

        let eval = Measurements {
            neck_angle: 30.99,
            ..upright()
        }
        .evaluate();
        assert_eq!(eval.reasons, vec!["Neck angle too steep (30°)"]);
    }

    #[test]
    fn test_knee_rule_boundary_is_strict() {
        // Exactly at the threshold: not triggered
        let mut set = upright_set();
        set.left_ankle = Landmark::new(0.0, 0.9);
        set.left_knee = Landmark::new(0.05, 0.7);
        // Keep the back vertical on the left side too
        set.left_shoulder = Landmark::new(0.05, 0.3);
        set.left_hip = Landmark::new(0.05, 0.5);
        let m = Measurements::from_landmarks(&set);
        assert!(!m.knee_forward);

        // Just past it: triggered
        set.left_knee = Landmark::new(0.0501, 0.7);
        let m = Measurements::from_landmarks(&set);
        assert!(m.knee_forward);

        let eval = Measurements {
            knee_forward: true,
            ..upright()
        }
        .evaluate();
        assert_eq!(eval.reasons, vec!["Knee exceeds ankle position"]);
    }

    #[test]
    fn test_neck_rule() {
        let eval = Measurements {
            neck_angle: 30.0,
            ..upright()
        }
        .evaluate();
        assert_eq!(eval.classification, Classification::Good);

        let eval = Measurements {
            neck_angle: 35.5,
            ..upright()
        }
        .evaluate();
        assert_eq!(eval.classification, Classification::Bad);
        assert_eq!(eval.reasons, vec!["Neck angle too steep (35°)"]);
    }

    #[test]
    fn test_reasons_accumulate_in_rule_order() {
        let eval = Measurements {
            back_angle: 140.0,
            neck_angle: 40.0,
            knee_forward: true,
        }
        .evaluate();
        assert_eq!(eval.classification, Classification::Bad);
        assert_eq!(
            eval.reasons,
            vec![
                "Severe back bend (140°)",
                "Knee exceeds ankle position",
                "Neck angle too steep (40°)",
            ]
        );
    }

    #[test]
    fn test_bent_figure_measured_as_bent() {
        // Lean the shoulders forward of the hips; the interior hip
        // angle drops well below 160
        let mut set = upright_set();
        set.left_shoulder = Landmark::new(0.63, 0.35);
        set.right_shoulder = Landmark::new(0.63, 0.35);
        let m = Measurements::from_landmarks(&set);
        assert!(m.back_angle < 160.0);

        let eval = evaluate(&set);
        assert_eq!(eval.classification, Classification::Bad);
        assert!(eval.reasons.iter().any(|r| r.contains("back")
            || r.contains("Back")
            || r.contains("Severe")));
    }
}
