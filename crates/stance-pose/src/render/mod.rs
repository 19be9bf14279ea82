mod canvas;

pub use canvas::RgbCanvas;

use crate::{BodyPart, MultiPoseConfig, PoseEstimate};
use stance_base::Vec2;
use stance_video::Frame;

/// 8-bit RGB colour.
pub type Rgb = [u8; 3];

/// Overlay colour for keypoints and skeleton edges.
pub const OVERLAY_COLOR: Rgb = [0, 255, 255];
/// Keypoint dot radius in pixels.
pub const KEYPOINT_RADIUS: f32 = 3.0;

/// Anatomically adjacent parts joined by skeleton edges.
pub const SKELETON: [(BodyPart, BodyPart); 12] = [
    (BodyPart::LeftHip, BodyPart::LeftShoulder),
    (BodyPart::LeftElbow, BodyPart::LeftShoulder),
    (BodyPart::LeftElbow, BodyPart::LeftWrist),
    (BodyPart::LeftHip, BodyPart::LeftKnee),
    (BodyPart::LeftKnee, BodyPart::LeftAnkle),
    (BodyPart::RightHip, BodyPart::RightShoulder),
    (BodyPart::RightElbow, BodyPart::RightShoulder),
    (BodyPart::RightElbow, BodyPart::RightWrist),
    (BodyPart::RightHip, BodyPart::RightKnee),
    (BodyPart::RightKnee, BodyPart::RightAnkle),
    (BodyPart::LeftShoulder, BodyPart::RightShoulder),
    (BodyPart::LeftHip, BodyPart::RightHip),
];

/// A 2-D drawing surface.
pub trait Canvas {
    /// Surface size in pixels as `(width, height)`.
    fn size(&self) -> (u32, u32);
    /// Cover the whole surface with `frame`.
    fn draw_frame(&mut self, frame: &Frame);
    fn draw_point(&mut self, center: Vec2<f32>, radius: f32, color: Rgb);
    fn draw_segment(&mut self, from: Vec2<f32>, to: Vec2<f32>, color: Rgb);
}

/// Draws the video frame and the skeleton overlay of confident poses.
///
/// Stateless: rendering the same frame and poses twice issues the same calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderer {
    min_pose_confidence: f32,
    min_part_confidence: f32,
    mirror: bool,
}

impl Renderer {
    pub fn from_config(config: &MultiPoseConfig) -> Self {
        Self {
            min_pose_confidence: config.min_pose_confidence(),
            min_part_confidence: config.min_part_confidence(),
            mirror: true,
        }
    }

    /// Show the frame as captured instead of as a selfie view.
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn mirror(&self) -> bool {
        self.mirror
    }

    pub fn render<C: Canvas>(&self, canvas: &mut C, frame: &Frame, poses: &[PoseEstimate]) {
        if self.mirror {
            canvas.draw_frame(&frame.mirrored());
        } else {
            canvas.draw_frame(frame);
        }

        // Keypoints live in frame coordinates; scale them onto the canvas
        let (cw, ch) = canvas.size();
        let sx = cw as f32 / frame.width().max(1) as f32;
        let sy = ch as f32 / frame.height().max(1) as f32;
        let width = frame.width() as f32;
        let place = |p: Vec2<f32>| {
            let x = if self.mirror { width - 1.0 - p.x } else { p.x };
            Vec2::new(x * sx, p.y * sy)
        };

        for pose in poses.iter().filter(|p| p.score() >= self.min_pose_confidence) {
            for (a, b) in SKELETON {
                let (Some(ka), Some(kb)) = (pose.keypoint(a), pose.keypoint(b)) else {
                    continue;
                };
                if ka.score >= self.min_part_confidence && kb.score >= self.min_part_confidence {
                    canvas.draw_segment(place(ka.position), place(kb.position), OVERLAY_COLOR);
                }
            }

            for kp in pose.keypoints() {
                if kp.score >= self.min_part_confidence {
                    canvas.draw_point(place(kp.position), KEYPOINT_RADIUS, OVERLAY_COLOR);
                }
            }
        }
    }
}
