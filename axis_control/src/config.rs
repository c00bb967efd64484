//! Robot configuration: shared settings, cycle period and the axis list.
//!
//! ```toml
//! cycle_period_ms = 20
//!
//! [shared]
//! service_name = "axis_control"
//!
//! [[axes]]
//! name = "ARM"
//! kind = "arm"
//! soft_limits = [0.0, 0.5]
//! homing_speed = 0.2
//! homing_current_amps = 20.0
//! target = 0.3
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axis_common::axis::config::AxisSettings;
use axis_common::config::{ConfigError, ConfigLoader, SharedConfig};
use axis_common::consts::{DEFAULT_CONTROL_PERIOD_MS, MAX_AXES};
use serde::Deserialize;
use tracing::{debug, info};

use crate::control::PositionController;
use crate::sim::{SimHandle, SimParams, simulated_axis};
use crate::subsystem::arm::{ARM_NUDGE_STEP, ARM_RETRACT_THRESHOLD};
use crate::subsystem::elbow::{ELBOW_NUDGE_STEP, ELBOW_SAFE_ANGLE};
use crate::subsystem::{Axis, AxisOptions, LimitPolicy, Mechanism};

// ─── Schema ─────────────────────────────────────────────────────────

/// Mechanism kind of a configured axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    #[default]
    Generic,
    Arm,
    Elbow,
}

/// One `[[axes]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisEntry {
    #[serde(flatten)]
    pub settings: AxisSettings,
    #[serde(default)]
    pub kind: AxisKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Overrides the mechanism's default nudge.
    #[serde(default)]
    pub nudge_step: Option<f64>,
    /// Arm retract threshold or elbow safe angle.
    #[serde(default)]
    pub safe_threshold: Option<f64>,
    #[serde(default)]
    pub limit_policy: LimitPolicy,
    #[serde(default)]
    pub homing_timeout_ticks: Option<u64>,
    /// Position to request once homed.
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub sim: SimParams,
}

fn default_enabled() -> bool {
    true
}

fn default_cycle_period_ms() -> u64 {
    DEFAULT_CONTROL_PERIOD_MS
}

impl AxisEntry {
    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn mechanism(&self) -> Mechanism {
        match self.kind {
            AxisKind::Generic => Mechanism::Generic,
            AxisKind::Arm => Mechanism::Arm {
                retract_threshold: self.safe_threshold.unwrap_or(ARM_RETRACT_THRESHOLD),
            },
            AxisKind::Elbow => Mechanism::Elbow {
                safe_angle: self.safe_threshold.unwrap_or(ELBOW_SAFE_ANGLE),
            },
        }
    }

    pub fn options(&self) -> AxisOptions {
        let default_step = match self.kind {
            AxisKind::Generic => 0.0,
            AxisKind::Arm => ARM_NUDGE_STEP,
            AxisKind::Elbow => ELBOW_NUDGE_STEP,
        };
        AxisOptions {
            mechanism: self.mechanism(),
            nudge_step: self.nudge_step.unwrap_or(default_step),
            limit_policy: self.limit_policy,
            homing_timeout_ticks: self.homing_timeout_ticks,
        }
    }

    fn validate(&self, period: Duration) -> Result<(), ConfigError> {
        let name = self.name();
        if name.is_empty() {
            return Err(ConfigError::ValidationError(
                "axis name cannot be empty".to_string(),
            ));
        }
        if let Some(step) = self.nudge_step {
            if !(step.is_finite() && step >= 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "axis {name}: nudge_step must be finite and >= 0, got {step}"
                )));
            }
        }
        if self.homing_timeout_ticks == Some(0) {
            return Err(ConfigError::ValidationError(format!(
                "axis {name}: homing_timeout_ticks must be > 0"
            )));
        }
        let sim = &self.sim;
        if !(sim.min_stop < sim.max_stop) || !(sim.max_speed > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "axis {name}: sim needs min_stop < max_stop and max_speed > 0"
            )));
        }
        // Surfaces builder errors (limits, homing, gains) at load time.
        self.settings.to_config(period).map(|_| ())
    }
}

/// Top-level robot configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct RobotConfig {
    pub shared: SharedConfig,
    #[serde(default = "default_cycle_period_ms")]
    pub cycle_period_ms: u64,
    #[serde(default)]
    pub axes: Vec<AxisEntry>,
}

impl RobotConfig {
    /// Load and validate.
    pub fn load_validated(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    #[inline]
    pub fn control_period(&self) -> Duration {
        Duration::from_millis(self.cycle_period_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        if self.cycle_period_ms == 0 {
            return Err(ConfigError::ValidationError(
                "cycle_period_ms must be > 0".to_string(),
            ));
        }
        if self.axes.len() > MAX_AXES {
            return Err(ConfigError::ValidationError(format!(
                "{} axes configured, max {MAX_AXES}",
                self.axes.len()
            )));
        }

        let mut seen = HashSet::new();
        for entry in &self.axes {
            if !seen.insert(entry.name()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate axis name: {}",
                    entry.name()
                )));
            }
            entry.validate(self.control_period())?;
        }
        Ok(())
    }

    /// Build every configured axis on simulated hardware.
    pub fn build_simulated(&self) -> Result<SimulatedRobot, ConfigError> {
        let period = self.control_period();
        let mut robot = SimulatedRobot::default();

        for entry in &self.axes {
            if !entry.enabled {
                info!(axis = %entry.name(), "Axis disabled in configuration");
                robot
                    .axes
                    .push(Axis::disabled(entry.name(), entry.mechanism()));
                continue;
            }

            let config = Arc::new(entry.settings.to_config(period)?);
            let params = SimParams {
                dt: period,
                ..entry.sim
            };
            let (driver, switches, handle) = simulated_axis(params);
            let controller = PositionController::bound(config, driver, switches);
            debug!(axis = %entry.name(), kind = ?entry.kind, "Axis built on simulated hardware");

            robot.axes.push(Axis::enabled(controller, entry.options()));
            robot.handles.push((entry.name().to_string(), handle));
            if let Some(target) = entry.target {
                robot.targets.push((entry.name().to_string(), target));
            }
        }
        Ok(robot)
    }
}

/// Axes plus the simulation handles behind them.
#[derive(Debug, Default)]
pub struct SimulatedRobot {
    pub axes: Vec<Axis>,
    pub handles: Vec<(String, SimHandle)>,
    /// `(axis, position)` to request once each axis is homed.
    pub targets: Vec<(String, f64)>,
}

impl SimulatedRobot {
    pub fn handle(&self, name: &str) -> Option<&SimHandle> {
        self.handles
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, h)| h)
    }
}
