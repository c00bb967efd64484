//! Robot configuration files and the errors shared by every config path.
//!
//! Files are TOML. Any `DeserializeOwned` type gets [`ConfigLoader`] for
//! free; axis parameters coming from a file end up in the same
//! [`ConfigError`] as parameters given to the builder in code.
//!
//! ```rust,no_run
//! use axis_common::config::{ConfigError, ConfigLoader, SharedConfig};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Robot {
//!     shared: SharedConfig,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let robot = Robot::load("robot.toml".as_ref())?;
//!     robot.shared.validate()
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Error type for configuration loading and validation.
///
/// Construction-time failures are fatal: a controller is never built from a
/// configuration that produced one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// No file at the given path.
    #[error("config file not found")]
    FileNotFound,

    /// Unreadable file or malformed TOML.
    #[error("config parse error: {0}")]
    ParseError(String),

    /// Well-formed file with an unusable value outside axis parameters.
    #[error("invalid config: {0}")]
    ValidationError(String),

    /// Soft-limit pair with `min > max`.
    #[error("axis '{axis}': soft limit min {min} exceeds max {max}")]
    InvalidSoftLimits {
        /// Axis name.
        axis: String,
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },

    /// Homing speed outside `(0, 1]`.
    #[error("axis '{axis}': homing speed {speed} outside (0, 1]")]
    InvalidHomingSpeed {
        /// Axis name.
        axis: String,
        /// Configured speed fraction.
        speed: f64,
    },

    /// Homing current threshold not strictly positive.
    #[error("axis '{axis}': homing current threshold {amps} A must be > 0")]
    InvalidHomingCurrent {
        /// Axis name.
        axis: String,
        /// Configured threshold.
        amps: f64,
    },

    /// Negative position tolerance.
    #[error("axis '{axis}': position tolerance {tolerance} must be >= 0")]
    NegativeTolerance {
        /// Axis name.
        axis: String,
        /// Configured tolerance.
        tolerance: f64,
    },

    /// Zero control period.
    #[error("axis '{axis}': control period must be > 0")]
    InvalidControlPeriod {
        /// Axis name.
        axis: String,
    },

    /// Negative closed-loop gain.
    #[error("axis '{axis}': gain {gain} = {value} must be >= 0")]
    InvalidGain {
        /// Axis name.
        axis: String,
        /// Gain name (`kp`, `ki`, `kd`).
        gain: &'static str,
        /// Configured value.
        value: f64,
    },

    /// NaN or infinite value in a numeric field.
    #[error("axis '{axis}': field '{field}' is not finite")]
    NonFinite {
        /// Axis name.
        axis: String,
        /// Field name.
        field: &'static str,
    },
}

/// Default log verbosity, written lowercase in TOML (`log_level = "warn"`).
///
/// `-v` on the command line and `RUST_LOG` both take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Filter directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// The `[shared]` table every robot file carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    #[serde(default)]
    pub log_level: LogLevel,
    /// Name reported in the startup log.
    pub service_name: String,
}

impl SharedConfig {
    /// Rejects an empty `service_name`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.service_name.trim() {
            "" => Err(ConfigError::ValidationError(
                "shared.service_name is empty".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// TOML loading for any deserializable config type.
///
/// A missing file is [`ConfigError::FileNotFound`]; every other I/O or
/// syntax failure is [`ConfigError::ParseError`]. Semantic checks are left
/// to the caller.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading configuration");
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
