//! Configuration surface for the Gambit controller.
//!
//! Everything that used to be a constant in the deployment scripts is a field
//! here: serial device names and baud, the four taught board corners, the
//! motion profile (heights and per-step speeds), the two preset pose command
//! strings, response-wait tuning, and the gripper duty pair. Configuration is
//! a YAML file; every section has deployment defaults, so a partial file (or
//! none of the optional sections) still yields a runnable setup to adjust.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod settings;

pub use settings::{
    GambitConfig, LinkSettings, MotionProfile, PresetPoses, ResponseTuning,
};

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Configuration load/validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No file at the given path.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("Failed to read {path}: {message}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error text.
        message: String,
    },

    /// The file read fine but is not valid YAML for the schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The parsed values are unusable.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// A specialized `Result` type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reads and validates a configuration file.
pub fn load(path: &Path) -> ConfigResult<GambitConfig> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_owned())
        } else {
            ConfigError::Io {
                path: path.to_owned(),
                message: e.to_string(),
            }
        }
    })?;
    let config: GambitConfig = serde_yaml::from_str(&raw)?;
    config.validate()?;
    info!(path = %path.display(), "configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn missing_file_is_its_own_error() {
        let err = load(Path::new("/nonexistent/gambit.yaml")).expect_err("no file there");
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn partial_yaml_fills_in_deployment_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "arm:\n  port: /dev/ttyACM3\n  baud: 115200").expect("write");
        let config = load(file.path()).expect("valid config");
        assert_eq!(config.arm.port, "/dev/ttyACM3");
        assert_eq!(config.arm.baud, 115_200);
        // Untouched sections keep their defaults.
        assert_eq!(config.gripper.baud, 9600);
        assert_eq!(config.board.file_max, 'h');
        assert_eq!(config.gripper_drive.open_duty, 35);
    }

    #[test]
    fn full_round_trip_through_yaml() {
        let config = GambitConfig::default();
        let yaml = serde_yaml::to_string(&config).expect("serializable");
        let back: GambitConfig = serde_yaml::from_str(&yaml).expect("parseable");
        assert_eq!(back, config);
    }

    #[test]
    fn garbage_yaml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "arm: [not, a, mapping]").expect("write");
        let err = load(file.path()).expect_err("schema mismatch");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_values_are_rejected_after_parse() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "arm:\n  port: \"\"\n  baud: 9600").expect("write");
        let err = load(file.path()).expect_err("empty port");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
