use std::fmt;

#[derive(Debug)]
pub enum VideoError {
    /// No camera capability on this platform or device; fatal at startup.
    Unavailable(String),
    Device(String),
    Stream(String),
    Decode(String),
    Channel(String),
    FrameSize { expected: usize, got: usize },
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::Unavailable(msg) => write!(f, "camera unavailable: {msg}"),
            VideoError::Device(msg) => write!(f, "device error: {msg}"),
            VideoError::Stream(msg) => write!(f, "stream error: {msg}"),
            VideoError::Decode(msg) => write!(f, "decode error: {msg}"),
            VideoError::Channel(msg) => write!(f, "channel error: {msg}"),
            VideoError::FrameSize { expected, got } => {
                write!(f, "frame size mismatch: expected {expected} bytes, got {got}")
            }
        }
    }
}

impl std::error::Error for VideoError {}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Device(err.to_string())
    }
}

#[cfg(feature = "v4l2")]
impl From<crates_image::ImageError> for VideoError {
    fn from(err: crates_image::ImageError) -> Self {
        VideoError::Decode(err.to_string())
    }
}
