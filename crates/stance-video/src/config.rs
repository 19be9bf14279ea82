use std::fmt;
use std::str::FromStr;

/// Capture resolution in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// 640x480, the default preset.
    pub const VGA: Resolution = Resolution::new(640, 480);
    /// 300x300, the small square preset.
    pub const SQUARE: Resolution = Resolution::new(300, 300);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::VGA
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = String;

    /// Parses `WIDTHxHEIGHT`, e.g. `640x480`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("invalid resolution '{s}', expected WIDTHxHEIGHT"))?;
        let width = w
            .parse::<u32>()
            .map_err(|e| format!("invalid width '{w}': {e}"))?;
        let height = h
            .parse::<u32>()
            .map_err(|e| format!("invalid height '{h}': {e}"))?;
        if width == 0 || height == 0 {
            return Err(format!("resolution must be non-zero, got '{s}'"));
        }
        Ok(Resolution::new(width, height))
    }
}

/// Which camera the demo prefers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FacingMode {
    /// Front camera, facing the user.
    #[default]
    User,
    /// Rear camera, facing away from the user.
    Environment,
}

/// Configuration for camera capture.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    device: String,
    resolution: Resolution,
    fps: u32,
    facing: FacingMode,
    buffer_count: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            resolution: Resolution::VGA,
            fps: 30,
            facing: FacingMode::User,
            buffer_count: 2,
        }
    }
}

impl CameraConfig {
    /// Set the device path (e.g., "/dev/video0").
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_facing(mut self, facing: FacingMode) -> Self {
        self.facing = facing;
        self
    }

    /// Set how many decoded frames may wait for the consumer before new ones are dropped.
    pub fn with_buffer_count(mut self, buffer_count: u32) -> Self {
        self.buffer_count = buffer_count.max(1);
        self
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn width(&self) -> u32 {
        self.resolution.width
    }

    pub fn height(&self) -> u32 {
        self.resolution.height
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn buffer_count(&self) -> u32 {
        self.buffer_count
    }
}
