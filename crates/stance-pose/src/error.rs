use crate::BodyPart;
use stance_video::VideoError;
use std::fmt;

#[derive(Debug)]
pub enum PoseError {
    DuplicatePart(BodyPart),
    Shape { expected: String, got: String },
    ModelLoad(String),
    Backend(String),
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoseError::DuplicatePart(part) => write!(f, "keypoint {part} appears more than once"),
            PoseError::Shape { expected, got } => {
                write!(f, "shape mismatch: expected {expected}, got {got}")
            }
            PoseError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            PoseError::Backend(msg) => write!(f, "backend error: {msg}"),
        }
    }
}

impl std::error::Error for PoseError {}

#[derive(Debug)]
pub enum AcquisitionError {
    Video(VideoError),
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionError::Video(err) => write!(f, "frame source error: {err}"),
        }
    }
}

impl std::error::Error for AcquisitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AcquisitionError::Video(err) => Some(err),
        }
    }
}

impl From<VideoError> for AcquisitionError {
    fn from(err: VideoError) -> Self {
        AcquisitionError::Video(err)
    }
}
