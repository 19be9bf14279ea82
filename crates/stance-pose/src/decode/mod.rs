//! Pure pre- and post-processing around a YOLO-pose network.
//!
//! Kept free of any runtime so it can be exercised without model weights.

mod letterbox;
mod postprocess;

pub use letterbox::{letterbox, Letterbox, INPUT_SIZE};
pub use postprocess::{decode_poses, instance_score, suppress_within_radius, OUTPUT_FEATURES};
