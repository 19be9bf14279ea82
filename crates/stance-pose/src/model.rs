use crate::{MultiPoseConfig, PoseError, PoseList};
use stance_video::Frame;
use std::path::PathBuf;

/// Where a model's weights come from.
#[derive(Debug, Clone)]
pub enum ModelSource {
    File(PathBuf),
    Memory(Vec<u8>),
}

/// A pretrained keypoint model.
///
/// Given one frame, returns zero or more pose estimates with keypoints in frame
/// pixel coordinates. Implementations honour the thresholds, pose cap and NMS
/// radius in `config`.
#[allow(async_fn_in_trait)]
pub trait KeypointModel {
    async fn estimate(
        &mut self,
        frame: &Frame,
        config: &MultiPoseConfig,
    ) -> Result<PoseList, PoseError>;
}
