use crate::PoseError;
use stance_base::Vec2;
use std::fmt;
use std::str::FromStr;

/// Body parts reported by the keypoint model, in model output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl BodyPart {
    pub const COUNT: usize = 17;

    pub const ALL: [BodyPart; BodyPart::COUNT] = [
        BodyPart::Nose,
        BodyPart::LeftEye,
        BodyPart::RightEye,
        BodyPart::LeftEar,
        BodyPart::RightEar,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftWrist,
        BodyPart::RightWrist,
        BodyPart::LeftHip,
        BodyPart::RightHip,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
        BodyPart::LeftAnkle,
        BodyPart::RightAnkle,
    ];

    /// Canonical part name, e.g. `leftEar`.
    pub fn name(self) -> &'static str {
        match self {
            BodyPart::Nose => "nose",
            BodyPart::LeftEye => "leftEye",
            BodyPart::RightEye => "rightEye",
            BodyPart::LeftEar => "leftEar",
            BodyPart::RightEar => "rightEar",
            BodyPart::LeftShoulder => "leftShoulder",
            BodyPart::RightShoulder => "rightShoulder",
            BodyPart::LeftElbow => "leftElbow",
            BodyPart::RightElbow => "rightElbow",
            BodyPart::LeftWrist => "leftWrist",
            BodyPart::RightWrist => "rightWrist",
            BodyPart::LeftHip => "leftHip",
            BodyPart::RightHip => "rightHip",
            BodyPart::LeftKnee => "leftKnee",
            BodyPart::RightKnee => "rightKnee",
            BodyPart::LeftAnkle => "leftAnkle",
            BodyPart::RightAnkle => "rightAnkle",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BodyPart {
    type Err = String;

    /// Exact, case-sensitive match on the canonical name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BodyPart::ALL
            .into_iter()
            .find(|part| part.name() == s)
            .ok_or_else(|| format!("unknown body part '{s}'"))
    }
}

impl TryFrom<usize> for BodyPart {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        BodyPart::ALL.get(value).copied().ok_or_else(|| {
            format!(
                "Invalid body part index: {}. Must be in range 0-{}.",
                value,
                BodyPart::COUNT - 1
            )
        })
    }
}

/// A detected body part with its position in frame pixels and its confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub part: BodyPart,
    pub position: Vec2<f32>,
    /// Confidence in [0.0, 1.0].
    pub score: f32,
}

impl Keypoint {
    pub fn new(part: BodyPart, x: f32, y: f32, score: f32) -> Self {
        Self {
            part,
            position: Vec2::new(x, y),
            score,
        }
    }
}

/// One detected person: an overall score and at most one keypoint per body part.
///
/// The model may return a partial set of parts, so lookups return `Option`.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseEstimate {
    score: f32,
    keypoints: Vec<Keypoint>,
}

impl PoseEstimate {
    /// Build a pose, rejecting keypoint lists that name a part twice.
    pub fn new(score: f32, keypoints: Vec<Keypoint>) -> Result<Self, PoseError> {
        let mut seen = [false; BodyPart::COUNT];
        for kp in &keypoints {
            let slot = &mut seen[kp.part.index()];
            if *slot {
                return Err(PoseError::DuplicatePart(kp.part));
            }
            *slot = true;
        }
        Ok(Self { score, keypoints })
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    pub fn keypoint(&self, part: BodyPart) -> Option<&Keypoint> {
        self.keypoints.iter().find(|kp| kp.part == part)
    }

    /// Same keypoints under a different overall score.
    pub(crate) fn rescored(self, score: f32) -> Self {
        Self { score, ..self }
    }
}

/// All poses detected in one frame, possibly empty.
pub type PoseList = Vec<PoseEstimate>;

/// Classification vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Unknown,
    TooClose,
    FacingLeft,
    FacingRight,
    FacingFront,
    RaiseWrist,
    Up,
    Left,
    Right,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Unknown => "unknown",
            Label::TooClose => "too close",
            Label::FacingLeft => "facing left",
            Label::FacingRight => "facing right",
            Label::FacingFront => "facing front",
            Label::RaiseWrist => "raise wrist",
            Label::Up => "up",
            Label::Left => "left",
            Label::Right => "right",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output. `confidence` is the raw score of the keypoint that decided
/// the label, not a calibrated probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub label: Label,
    pub confidence: f32,
}

impl ClassificationResult {
    pub fn new(label: Label, confidence: f32) -> Self {
        Self { label, confidence }
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2})", self.label, self.confidence)
    }
}
