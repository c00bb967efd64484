//! Controller configuration and its validating builder.
//!
//! A [`ControllerConfig`] is assembled once at startup, either in code via
//! [`ControllerConfig::builder`] or from TOML via [`AxisSettings`]. Both paths
//! end in [`ControllerConfigBuilder::build`], which rejects unsafe values with
//! a [`ConfigError`] instead of substituting defaults. The built value is
//! immutable.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::homing::{HomeDirection, HomingParams};
use crate::config::ConfigError;
use crate::consts::{
    DEFAULT_CONTROL_PERIOD, DEFAULT_HOMING_CURRENT_AMPS, DEFAULT_HOMING_SPEED, DEFAULT_KP,
    DEFAULT_POSITION_TOLERANCE,
};

// ─── Soft Limits ────────────────────────────────────────────────────

/// Software position bounds [physical units], `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftLimits {
    /// Lowest position a request may target.
    pub min: f64,
    /// Highest position a request may target.
    pub max: f64,
}

impl SoftLimits {
    /// Saturate a position into `[min, max]`.
    #[inline]
    pub fn clamp(&self, position: f64) -> f64 {
        position.clamp(self.min, self.max)
    }

    /// Whether `position` lies inside the bounds (inclusive).
    #[inline]
    pub fn contains(&self, position: f64) -> bool {
        position >= self.min && position <= self.max
    }
}

impl Default for SoftLimits {
    /// Zero-width range: without explicit limits no request can move the axis.
    fn default() -> Self {
        Self { min: 0.0, max: 0.0 }
    }
}

// ─── Closed-Loop Gains ──────────────────────────────────────────────

/// PID gains of the position loop. Output is saturated to [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosedLoopGains {
    /// Proportional gain [output / unit].
    pub kp: f64,
    /// Integral gain (0 = disabled).
    pub ki: f64,
    /// Derivative gain (0 = disabled).
    pub kd: f64,
}

impl Default for ClosedLoopGains {
    fn default() -> Self {
        Self {
            kp: DEFAULT_KP,
            ki: 0.0,
            kd: 0.0,
        }
    }
}

// ─── Controller Config ──────────────────────────────────────────────

/// Immutable parameter bundle for one position controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    name: String,
    soft_limits: SoftLimits,
    homing: HomingParams,
    position_tolerance: f64,
    inverted: bool,
    home_offset: f64,
    gains: ClosedLoopGains,
    control_period: Duration,
    brake_on_idle: bool,
}

impl ControllerConfig {
    /// Start building a configuration for the named axis.
    pub fn builder(name: impl Into<String>) -> ControllerConfigBuilder {
        ControllerConfigBuilder::new(name)
    }

    /// Axis name (diagnostics only).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn soft_limits(&self) -> SoftLimits {
        self.soft_limits
    }

    #[inline]
    pub fn homing(&self) -> HomingParams {
        self.homing
    }

    /// Maximum |actual − requested| still counted as arrived.
    #[inline]
    pub fn position_tolerance(&self) -> f64 {
        self.position_tolerance
    }

    #[inline]
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    /// Position assigned to the mechanism at the homing hard stop.
    #[inline]
    pub fn home_offset(&self) -> f64 {
        self.home_offset
    }

    #[inline]
    pub fn gains(&self) -> ClosedLoopGains {
        self.gains
    }

    /// Fixed tick period the controller is updated at.
    #[inline]
    pub fn control_period(&self) -> Duration {
        self.control_period
    }

    #[inline]
    pub fn brake_on_idle(&self) -> bool {
        self.brake_on_idle
    }
}

// ─── Builder ────────────────────────────────────────────────────────

/// Builder for [`ControllerConfig`].
///
/// Every setting is optional. Validation runs once, in [`build`](Self::build),
/// in a fixed order: finiteness, soft limits, homing, tolerance, gains,
/// control period.
#[derive(Debug, Clone)]
pub struct ControllerConfigBuilder {
    name: String,
    soft_limits: SoftLimits,
    homing_speed: f64,
    homing_current_amps: f64,
    home_direction: HomeDirection,
    position_tolerance: f64,
    inverted: bool,
    home_offset: f64,
    gains: ClosedLoopGains,
    control_period: Duration,
    brake_on_idle: bool,
}

impl ControllerConfigBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            soft_limits: SoftLimits::default(),
            homing_speed: DEFAULT_HOMING_SPEED,
            homing_current_amps: DEFAULT_HOMING_CURRENT_AMPS,
            home_direction: HomeDirection::default(),
            position_tolerance: DEFAULT_POSITION_TOLERANCE,
            inverted: false,
            home_offset: 0.0,
            gains: ClosedLoopGains::default(),
            control_period: DEFAULT_CONTROL_PERIOD,
            brake_on_idle: true,
        }
    }

    pub fn soft_limits(mut self, min: f64, max: f64) -> Self {
        self.soft_limits = SoftLimits { min, max };
        self
    }

    /// Homing output fraction and stall-current threshold.
    pub fn homing(mut self, speed_fraction: f64, current_threshold_amps: f64) -> Self {
        self.homing_speed = speed_fraction;
        self.homing_current_amps = current_threshold_amps;
        self
    }

    pub fn home_direction(mut self, direction: HomeDirection) -> Self {
        self.home_direction = direction;
        self
    }

    pub fn position_tolerance(mut self, tolerance: f64) -> Self {
        self.position_tolerance = tolerance;
        self
    }

    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn home_offset(mut self, offset: f64) -> Self {
        self.home_offset = offset;
        self
    }

    pub fn gains(mut self, kp: f64, ki: f64, kd: f64) -> Self {
        self.gains = ClosedLoopGains { kp, ki, kd };
        self
    }

    pub fn control_period(mut self, period: Duration) -> Self {
        self.control_period = period;
        self
    }

    pub fn brake_on_idle(mut self, brake: bool) -> Self {
        self.brake_on_idle = brake;
        self
    }

    /// Validate every setting and produce the immutable configuration.
    ///
    /// # Errors
    ///
    /// - `NonFinite` for any NaN/infinite numeric field
    /// - `InvalidSoftLimits` if `min > max`
    /// - `InvalidHomingSpeed` if speed is outside `(0, 1]`
    /// - `InvalidHomingCurrent` if the threshold is not `> 0`
    /// - `NegativeTolerance` if tolerance `< 0`
    /// - `InvalidGain` for a negative gain
    /// - `InvalidControlPeriod` for a zero period
    pub fn build(self) -> Result<ControllerConfig, ConfigError> {
        let axis = self.name.clone();
        let numeric: [(&'static str, f64); 9] = [
            ("soft_limits.min", self.soft_limits.min),
            ("soft_limits.max", self.soft_limits.max),
            ("homing_speed", self.homing_speed),
            ("homing_current_amps", self.homing_current_amps),
            ("position_tolerance", self.position_tolerance),
            ("home_offset", self.home_offset),
            ("kp", self.gains.kp),
            ("ki", self.gains.ki),
            ("kd", self.gains.kd),
        ];
        if let Some((field, _)) = numeric.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite { axis, field });
        }

        if self.soft_limits.min > self.soft_limits.max {
            return Err(ConfigError::InvalidSoftLimits {
                axis,
                min: self.soft_limits.min,
                max: self.soft_limits.max,
            });
        }
        if self.homing_speed <= 0.0 || self.homing_speed > 1.0 {
            return Err(ConfigError::InvalidHomingSpeed {
                axis,
                speed: self.homing_speed,
            });
        }
        if self.homing_current_amps <= 0.0 {
            return Err(ConfigError::InvalidHomingCurrent {
                axis,
                amps: self.homing_current_amps,
            });
        }
        if self.position_tolerance < 0.0 {
            return Err(ConfigError::NegativeTolerance {
                axis,
                tolerance: self.position_tolerance,
            });
        }
        for (gain, value) in [
            ("kp", self.gains.kp),
            ("ki", self.gains.ki),
            ("kd", self.gains.kd),
        ] {
            if value < 0.0 {
                return Err(ConfigError::InvalidGain { axis, gain, value });
            }
        }
        if self.control_period.is_zero() {
            return Err(ConfigError::InvalidControlPeriod { axis });
        }

        Ok(ControllerConfig {
            name: self.name,
            soft_limits: self.soft_limits,
            homing: HomingParams {
                speed: self.homing_speed,
                current_threshold_amps: self.homing_current_amps,
                direction: self.home_direction,
            },
            position_tolerance: self.position_tolerance,
            inverted: self.inverted,
            home_offset: self.home_offset,
            gains: self.gains,
            control_period: self.control_period,
            brake_on_idle: self.brake_on_idle,
        })
    }
}

// ─── TOML Settings ──────────────────────────────────────────────────

/// File form of a controller configuration.
///
/// Every field except `name` is optional; omitted fields take the builder's
/// defaults. Conversion goes through the builder, so file and code
/// configuration share one validation path.
///
/// # TOML Example
///
/// ```toml
/// name = "ARM"
/// soft_limits = [0.0, 0.5]
/// homing_speed = 0.2
/// homing_current_amps = 20.0
/// position_tolerance = 0.01
/// inverted = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AxisSettings {
    /// Axis name.
    pub name: String,
    /// `[min, max]` soft limits.
    #[serde(default)]
    pub soft_limits: Option<[f64; 2]>,
    #[serde(default)]
    pub homing_speed: Option<f64>,
    #[serde(default)]
    pub homing_current_amps: Option<f64>,
    #[serde(default)]
    pub home_direction: Option<HomeDirection>,
    #[serde(default)]
    pub position_tolerance: Option<f64>,
    #[serde(default)]
    pub inverted: Option<bool>,
    #[serde(default)]
    pub home_offset: Option<f64>,
    #[serde(default)]
    pub kp: Option<f64>,
    #[serde(default)]
    pub ki: Option<f64>,
    #[serde(default)]
    pub kd: Option<f64>,
    #[serde(default)]
    pub brake_on_idle: Option<bool>,
}

impl AxisSettings {
    /// Build the controller configuration for a loop running at `control_period`.
    pub fn to_config(&self, control_period: Duration) -> Result<ControllerConfig, ConfigError> {
        let mut builder =
            ControllerConfig::builder(self.name.clone()).control_period(control_period);

        if let Some([min, max]) = self.soft_limits {
            builder = builder.soft_limits(min, max);
        }
        builder = builder.homing(
            self.homing_speed.unwrap_or(DEFAULT_HOMING_SPEED),
            self.homing_current_amps.unwrap_or(DEFAULT_HOMING_CURRENT_AMPS),
        );
        if let Some(direction) = self.home_direction {
            builder = builder.home_direction(direction);
        }
        if let Some(tolerance) = self.position_tolerance {
            builder = builder.position_tolerance(tolerance);
        }
        if let Some(inverted) = self.inverted {
            builder = builder.inverted(inverted);
        }
        if let Some(offset) = self.home_offset {
            builder = builder.home_offset(offset);
        }
        let defaults = ClosedLoopGains::default();
        builder = builder.gains(
            self.kp.unwrap_or(defaults.kp),
            self.ki.unwrap_or(defaults.ki),
            self.kd.unwrap_or(defaults.kd),
        );
        if let Some(brake) = self.brake_on_idle {
            builder = builder.brake_on_idle(brake);
        }

        builder.build()
    }
}
