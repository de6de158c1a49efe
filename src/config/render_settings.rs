use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::actions::render_image::tiled_renderer::RenderMode;
use crate::protocol::messages::{DrawImageRequest, DrawImageRequestError};
use crate::protocol::worker_id::WorkerId;

pub const DEFAULT_WIDTH: u32 = 500;
pub const DEFAULT_HEIGHT: u32 = 350;
pub const DEFAULT_NUMBER_OF_ITERATIONS: u32 = 5;
pub const DEFAULT_DIVISION_FACTOR: u32 = 2;
pub const DEFAULT_CUT_OFF: f64 = 1.5;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// User-facing render settings. Missing fields in a settings file fall back
/// to the defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub number_of_iterations: u32,
    pub division_factor: u32,
    pub cut_off: f64,
    pub parallel: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            number_of_iterations: DEFAULT_NUMBER_OF_ITERATIONS,
            division_factor: DEFAULT_DIVISION_FACTOR,
            cut_off: DEFAULT_CUT_OFF,
            parallel: false,
        }
    }
}

impl RenderSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_str(&json)
    }

    #[must_use]
    pub fn mode(&self) -> RenderMode {
        if self.parallel {
            RenderMode::ParallelRows
        } else {
            RenderMode::Sequential
        }
    }

    /// Validates the settings into a request for the given job.
    pub fn to_request(&self, worker_id: WorkerId) -> Result<DrawImageRequest, DrawImageRequestError> {
        Ok(DrawImageRequest::new(
            worker_id,
            self.width,
            self.height,
            self.number_of_iterations,
            self.division_factor,
            self.cut_off,
        )?
        .with_mode(self.mode()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = RenderSettings::default();

        assert_eq!((settings.width, settings.height), (500, 350));
        assert_eq!(settings.number_of_iterations, 5);
        assert_eq!(settings.division_factor, 2);
        assert_eq!(settings.cut_off, 1.5);
        assert_eq!(settings.mode(), RenderMode::Sequential);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            RenderSettings::from_json_str(r#"{"width": 80, "cutOff": 0.5, "parallel": true}"#).unwrap();

        assert_eq!(settings.width, 80);
        assert_eq!(settings.height, 350);
        assert_eq!(settings.cut_off, 0.5);
        assert_eq!(settings.mode(), RenderMode::ParallelRows);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(matches!(
            RenderSettings::from_json_str(r#"{"widht": 80}"#),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"numberOfIterations": 7, "divisionFactor": 3}}"#).unwrap();

        let settings = RenderSettings::from_json_file(file.path()).unwrap();

        assert_eq!(settings.number_of_iterations, 7);
        assert_eq!(settings.division_factor, 3);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = RenderSettings::from_json_file("/nonexistent/settings.json").unwrap_err();

        assert!(err.to_string().contains("/nonexistent/settings.json"));
    }

    #[test]
    fn test_to_request_validates() {
        let settings = RenderSettings {
            parallel: true,
            ..RenderSettings::default()
        };

        let request = settings.to_request(WorkerId::new(5)).unwrap();
        assert_eq!(request.worker_id(), WorkerId::new(5));
        assert_eq!(request.pixel_rect().size(), 175_000);
        assert_eq!(request.mode(), RenderMode::ParallelRows);

        let illegal = RenderSettings {
            cut_off: 400.0,
            ..RenderSettings::default()
        };
        assert!(illegal.to_request(WorkerId::new(6)).is_err());
    }
}
