//! Pose pipeline for the stance demo: keypoint data model, the model
//! boundary, the rule-based pose classifier, the acquisition loop that
//! publishes pose snapshots, and the overlay renderer.

pub mod acquisition;
pub mod classify;
pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod render;
pub mod types;

#[cfg(feature = "onnx")]
pub mod onnx;

pub use acquisition::{PoseAcquisition, PoseFeed, Snapshot, Tick};
pub use classify::{dominant_pose, Heuristic, PoseClassifier, Thresholds};
pub use config::MultiPoseConfig;
pub use error::{AcquisitionError, PoseError};
pub use model::{KeypointModel, ModelSource};
pub use render::{Canvas, Renderer, RgbCanvas, SKELETON};
pub use types::{BodyPart, ClassificationResult, Keypoint, Label, PoseEstimate, PoseList};

#[cfg(feature = "onnx")]
pub use onnx::OnnxPoseModel;
