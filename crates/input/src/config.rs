use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::registry::DispatchPolicy;
use crate::sample::AbsencePolicy;

/// Errors from loading a [`ControlsConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Tunables for a [`DeviceOrientationControls`](crate::DeviceOrientationControls).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Calibration added to alpha, in radians.
    pub alpha_offset: f64,
    pub absence: AbsencePolicy,
    pub dispatch: DispatchPolicy,
}

impl ControlsConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(serde_yaml::from_str(&data)?),
            Some("json") => Ok(serde_json::from_str(&data)?),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_faithful() {
        let c = ControlsConfig::default();
        assert_eq!(c.alpha_offset, 0.0);
        assert_eq!(c.absence, AbsencePolicy::Legacy);
        assert_eq!(c.dispatch, DispatchPolicy::Abort);
    }

    #[test]
    fn load_yaml_with_partial_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controls.yaml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "alpha_offset: 0.5\nabsence: explicit").unwrap();

        let c = ControlsConfig::load(&path).unwrap();
        assert_eq!(c.alpha_offset, 0.5);
        assert_eq!(c.absence, AbsencePolicy::Explicit);
        assert_eq!(c.dispatch, DispatchPolicy::Abort);
    }

    #[test]
    fn load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controls.json");
        std::fs::write(&path, r#"{"dispatch": "isolate"}"#).unwrap();

        let c = ControlsConfig::load(&path).unwrap();
        assert_eq!(c.dispatch, DispatchPolicy::Isolate);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controls.toml");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            ControlsConfig::load(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ControlsConfig::load(&dir.path().join("nope.yaml")),
            Err(ConfigError::Io(_))
        ));
    }
}
