//! Frame source boundary for the stance pose demo.
//!
//! This crate provides the `FrameSource` trait for async frame capture, the
//! `Frame` pixel container, camera configuration and the Start/Stop playback
//! control, with a V4L2 backend behind the `v4l2` feature.

pub mod config;
pub mod error;
pub mod frame;
pub mod playback;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::{CameraConfig, FacingMode, Resolution};
pub use error::VideoError;
pub use frame::Frame;
pub use playback::Playback;
pub use traits::FrameSource;

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Camera;
