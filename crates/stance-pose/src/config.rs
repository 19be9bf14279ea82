//! Tuned constants and the model configuration.
//!
//! The classifier thresholds encode hand-tuned behaviour; change them only
//! together with the classifier tests.

/// Most poses the model reports per frame.
pub const MAX_POSE_DETECTIONS: usize = 5;
/// Poses scoring below this are neither reported nor drawn.
pub const MIN_POSE_CONFIDENCE: f32 = 0.15;
/// Keypoints scoring below this are not drawn.
pub const MIN_PART_CONFIDENCE: f32 = 0.1;
/// Pixel radius within which two poses' matching keypoints count as the same point.
pub const NMS_RADIUS: f32 = 30.0;

/// Ear/nose gate of the facing heuristic.
pub const FACING_GATE: f32 = 0.15;
/// Shoulder/elbow/wrist gate of the arm heuristic.
pub const ARM_GATE: f32 = 0.2;
/// |dy/dx| above which the forearm points straight up.
pub const STEEP_RATIO: f32 = 3.0;
/// |dy/dx| above which the forearm counts as raised.
pub const RAISED_RATIO: f32 = 1.0;
/// |dy/dx| below which the forearm counts as level (about tan 30°).
pub const LEVEL_RATIO: f32 = 0.57;
/// |dy/dx| of the ear-to-ear line above which the head is too tilted to judge.
pub const TILT_RATIO: f32 = 1.0;

/// Configuration passed to the keypoint model on every inference call.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiPoseConfig {
    multi_pose: bool,
    max_detections: usize,
    min_pose_confidence: f32,
    min_part_confidence: f32,
    nms_radius: f32,
}

impl Default for MultiPoseConfig {
    fn default() -> Self {
        Self {
            multi_pose: true,
            max_detections: MAX_POSE_DETECTIONS,
            min_pose_confidence: MIN_POSE_CONFIDENCE,
            min_part_confidence: MIN_PART_CONFIDENCE,
            nms_radius: NMS_RADIUS,
        }
    }
}

impl MultiPoseConfig {
    pub fn with_multi_pose(mut self, multi_pose: bool) -> Self {
        self.multi_pose = multi_pose;
        self
    }

    pub fn with_max_detections(mut self, max_detections: usize) -> Self {
        self.max_detections = max_detections;
        self
    }

    pub fn with_min_pose_confidence(mut self, threshold: f32) -> Self {
        self.min_pose_confidence = threshold;
        self
    }

    pub fn with_min_part_confidence(mut self, threshold: f32) -> Self {
        self.min_part_confidence = threshold;
        self
    }

    pub fn with_nms_radius(mut self, radius: f32) -> Self {
        self.nms_radius = radius;
        self
    }

    pub fn multi_pose(&self) -> bool {
        self.multi_pose
    }

    /// Pose cap for one frame; 1 when multi-pose detection is off.
    pub fn max_detections(&self) -> usize {
        if self.multi_pose {
            self.max_detections
        } else {
            self.max_detections.min(1)
        }
    }

    pub fn min_pose_confidence(&self) -> f32 {
        self.min_pose_confidence
    }

    pub fn min_part_confidence(&self) -> f32 {
        self.min_part_confidence
    }

    pub fn nms_radius(&self) -> f32 {
        self.nms_radius
    }
}
