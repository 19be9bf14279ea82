use stance_pose::Heuristic;
use stance_video::Resolution;
use std::path::PathBuf;

/// Demo settings read from `STANCE_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model_path: PathBuf,
    pub device: String,
    pub resolution: Resolution,
    pub heuristic: Heuristic,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/yolov8n-pose.onnx"),
            device: "/dev/video0".to_string(),
            resolution: Resolution::VGA,
            heuristic: Heuristic::RightArm,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut settings = Settings::default();

        if let Some(path) = lookup("STANCE_MODEL_PATH") {
            settings.model_path = path.into();
        }
        if let Some(device) = lookup("STANCE_DEVICE") {
            settings.device = device;
        }
        if let Some(resolution) = lookup("STANCE_RESOLUTION") {
            settings.resolution = resolution.parse()?;
        }
        if let Some(heuristic) = lookup("STANCE_HEURISTIC") {
            settings.heuristic = match heuristic.trim() {
                "arm" => Heuristic::RightArm,
                "facing" => Heuristic::Facing,
                other => return Err(format!("unknown heuristic '{other}', expected arm or facing")),
            };
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(Settings::from_lookup(lookup(&[])).unwrap(), Settings::default());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("STANCE_MODEL_PATH", "/opt/models/pose.onnx"),
            ("STANCE_DEVICE", "/dev/video2"),
            ("STANCE_RESOLUTION", "300x300"),
            ("STANCE_HEURISTIC", "facing"),
        ]))
        .unwrap();

        assert_eq!(settings.model_path, PathBuf::from("/opt/models/pose.onnx"));
        assert_eq!(settings.device, "/dev/video2");
        assert_eq!(settings.resolution, Resolution::SQUARE);
        assert_eq!(settings.heuristic, Heuristic::Facing);
    }

    #[test]
    fn test_bad_values_are_errors() {
        assert!(Settings::from_lookup(lookup(&[("STANCE_HEURISTIC", "legs")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("STANCE_RESOLUTION", "big")])).is_err());
    }
}
