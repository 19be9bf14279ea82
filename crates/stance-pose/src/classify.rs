use crate::config::{ARM_GATE, FACING_GATE, LEVEL_RATIO, RAISED_RATIO, STEEP_RATIO, TILT_RATIO};
use crate::{BodyPart, ClassificationResult, Keypoint, Label, PoseEstimate};

/// Which geometric heuristic the classifier applies to the dominant pose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// Head direction from nose and ear visibility.
    Facing,
    /// Right forearm direction from shoulder, elbow and wrist.
    #[default]
    RightArm,
}

/// Threshold set for both heuristics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub facing_gate: f32,
    pub arm_gate: f32,
    pub steep_ratio: f32,
    pub raised_ratio: f32,
    pub level_ratio: f32,
    pub tilt_ratio: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            facing_gate: FACING_GATE,
            arm_gate: ARM_GATE,
            steep_ratio: STEEP_RATIO,
            raised_ratio: RAISED_RATIO,
            level_ratio: LEVEL_RATIO,
            tilt_ratio: TILT_RATIO,
        }
    }
}

/// Rule-based pose classifier.
///
/// Each heuristic is an ordered cascade: the first rule whose condition holds
/// decides the label, and the confidence is the raw score of the keypoint that
/// decided it.
#[derive(Debug, Clone, Default)]
pub struct PoseClassifier {
    heuristic: Heuristic,
    thresholds: Thresholds,
}

/// The pose with the highest overall score; the first one wins ties.
pub fn dominant_pose(poses: &[PoseEstimate]) -> Option<&PoseEstimate> {
    poses.iter().fold(None, |best: Option<&PoseEstimate>, pose| match best {
        Some(b) if pose.score() <= b.score() => Some(b),
        _ => Some(pose),
    })
}

impl PoseClassifier {
    pub fn new(heuristic: Heuristic) -> Self {
        Self {
            heuristic,
            thresholds: Thresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn classify(&self, poses: &[PoseEstimate]) -> ClassificationResult {
        let pose = match dominant_pose(poses) {
            Some(pose) if pose.score() != 0.0 => pose,
            _ => return ClassificationResult::new(Label::Unknown, 1.0),
        };

        let result = match self.heuristic {
            Heuristic::Facing => self.classify_facing(pose),
            Heuristic::RightArm => self.classify_right_arm(pose),
        };

        result.unwrap_or(ClassificationResult::new(Label::Unknown, 0.0))
    }

    /// `None` when a required part is missing.
    fn classify_facing(&self, pose: &PoseEstimate) -> Option<ClassificationResult> {
        let nose = pose.keypoint(BodyPart::Nose)?;
        let left_ear = pose.keypoint(BodyPart::LeftEar)?;
        let right_ear = pose.keypoint(BodyPart::RightEar)?;
        let gate = self.thresholds.facing_gate;

        let result = if nose.score < gate {
            (Label::TooClose, left_ear.score.max(right_ear.score))
        } else if left_ear.score < gate && right_ear.score < gate {
            (Label::TooClose, nose.score)
        } else if left_ear.score < gate {
            // left ear hidden behind the head
            (Label::FacingLeft, right_ear.score)
        } else if right_ear.score < gate {
            (Label::FacingRight, left_ear.score)
        } else {
            let xdiff = left_ear.position.x - right_ear.position.x;
            let ydiff = right_ear.position.y - left_ear.position.y;
            let ratio = ydiff / xdiff;
            if ratio.abs() <= self.thresholds.tilt_ratio {
                (Label::FacingFront, nose.score)
            } else {
                (Label::Unknown, right_ear.score)
            }
        };

        Some(ClassificationResult::new(result.0, result.1))
    }

    /// `None` when a required part is missing.
    fn classify_right_arm(&self, pose: &PoseEstimate) -> Option<ClassificationResult> {
        let shoulder = pose.keypoint(BodyPart::RightShoulder)?;
        let elbow = pose.keypoint(BodyPart::RightElbow)?;
        let wrist = pose.keypoint(BodyPart::RightWrist)?;
        let t = &self.thresholds;

        let required = [shoulder, elbow, wrist];
        if let Some(failed) = required.iter().position(|kp| kp.score < t.arm_gate) {
            return Some(ClassificationResult::new(
                Label::TooClose,
                best_score_except(&required, failed),
            ));
        }

        // Vertical delta is measured upward, so a raised wrist gives ydiff > 0
        let xdiff = wrist.position.x - elbow.position.x;
        let ydiff = elbow.position.y - wrist.position.y;
        let ratio = (ydiff / xdiff).abs();
        let horizontal = if xdiff > 0.0 { Label::Right } else { Label::Left };

        let (label, confidence) = if ydiff > 0.0 && ratio > t.steep_ratio {
            (Label::Up, wrist.score)
        } else if ratio > t.raised_ratio && wrist.position.y < shoulder.position.y {
            (Label::RaiseWrist, wrist.score)
        } else if ratio < t.level_ratio {
            (horizontal, elbow.score)
        } else if ydiff > 0.0 && ratio <= t.raised_ratio {
            (horizontal, elbow.score)
        } else {
            (Label::Unknown, wrist.score)
        };

        Some(ClassificationResult::new(label, confidence))
    }
}

fn best_score_except(points: &[&Keypoint], skip: usize) -> f32 {
    points
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != skip)
        .map(|(_, kp)| kp.score)
        .fold(0.0, f32::max)
}
