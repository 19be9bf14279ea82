use super::Letterbox;
use crate::{BodyPart, Keypoint, MultiPoseConfig, PoseError, PoseEstimate, PoseList};

/// Features per candidate: box (4), confidence (1), then x, y, score per part.
pub const OUTPUT_FEATURES: usize = 5 + 3 * BodyPart::COUNT;

/// Turn raw `[1, 56, N]` network output into poses in frame pixels.
///
/// Candidates below `min_pose_confidence` are dropped, the rest are ordered by
/// confidence and thinned with `suppress_within_radius`.
pub fn decode_poses(
    output: &[f32],
    shape: &[usize],
    letterbox: &Letterbox,
    config: &MultiPoseConfig,
) -> Result<PoseList, PoseError> {
    if shape.len() != 3 || shape[0] != 1 || shape[1] != OUTPUT_FEATURES {
        return Err(PoseError::Shape {
            expected: format!("[1, {OUTPUT_FEATURES}, N]"),
            got: format!("{shape:?}"),
        });
    }
    let n = shape[2];
    if output.len() != OUTPUT_FEATURES * n {
        return Err(PoseError::Shape {
            expected: format!("{} values", OUTPUT_FEATURES * n),
            got: format!("{} values", output.len()),
        });
    }

    // Feature f of candidate i lives at f * n + i
    let at = |feature: usize, i: usize| output[feature * n + i];

    let mut candidates = Vec::new();
    for i in 0..n {
        let confidence = at(4, i);
        // NaN confidence counts as below threshold
        if !(confidence >= config.min_pose_confidence()) {
            continue;
        }

        let keypoints = BodyPart::ALL
            .iter()
            .map(|&part| {
                let base = 5 + part.index() * 3;
                let position = letterbox.to_frame(at(base, i), at(base + 1, i));
                Keypoint {
                    part,
                    position,
                    score: at(base + 2, i),
                }
            })
            .collect();
        candidates.push(PoseEstimate::new(confidence, keypoints)?);
    }

    // Stable, so equal scores keep network order
    candidates.sort_by(|a, b| b.score().total_cmp(&a.score()));

    Ok(suppress_within_radius(candidates, config))
}

/// Mean keypoint score of `candidate`, counting only parts that are farther than
/// `radius` from the same part of every pose in `kept`.
pub fn instance_score(candidate: &PoseEstimate, kept: &[PoseEstimate], radius: f32) -> f32 {
    let total: f32 = candidate
        .keypoints()
        .iter()
        .filter(|kp| {
            !kept.iter().any(|other| {
                other
                    .keypoint(kp.part)
                    .is_some_and(|o| o.position.distance(kp.position) <= radius)
            })
        })
        .map(|kp| kp.score)
        .sum();
    total / BodyPart::COUNT as f32
}

/// Radius-based non-maximum suppression over candidates sorted best first.
///
/// Each candidate is rescored with `instance_score` against the poses kept so
/// far and dropped when that falls below `min_pose_confidence`. At most
/// `max_detections()` poses are kept.
pub fn suppress_within_radius(candidates: PoseList, config: &MultiPoseConfig) -> PoseList {
    let mut kept: PoseList = Vec::new();
    for candidate in candidates {
        if kept.len() >= config.max_detections() {
            break;
        }
        let score = instance_score(&candidate, &kept, config.nms_radius());
        if score < config.min_pose_confidence() {
            continue;
        }
        kept.push(candidate.rescored(score));
    }
    kept
}
