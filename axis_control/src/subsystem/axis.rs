//! Generic axis subsystem.
//!
//! | Accessor kind | Disabled axis returns |
//! |---------------|-----------------------|
//! | positions | [`POSITION_UNKNOWN`] |
//! | booleans | `false` |
//! | commands | ignored (debug log) |

use axis_common::axis::state::ControlMode;
use axis_common::axis::telemetry::TelemetrySink;
use axis_common::consts::POSITION_UNKNOWN;
use serde::Deserialize;
use tracing::{debug, warn};

use super::arm::ArmAxis;
use super::elbow::ElbowAxis;
use super::watchdog::HomingWatchdog;
use crate::control::PositionController;

// ─── Options ────────────────────────────────────────────────────────

/// What the axis does when a limit switch trips while positioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitPolicy {
    /// Expose the switch state only.
    #[default]
    Report,
    /// Stop the controller when the switch in the direction of travel trips.
    Stop,
}

/// Which mechanism an axis drives.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Mechanism {
    #[default]
    Generic,
    /// Telescoping arm; retracted below `retract_threshold`.
    Arm { retract_threshold: f64 },
    /// Elbow joint; arm may extend above `safe_angle`.
    Elbow { safe_angle: f64 },
}

/// Per-axis behavior outside the controller itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisOptions {
    pub mechanism: Mechanism,
    /// Distance moved by one nudge.
    pub nudge_step: f64,
    pub limit_policy: LimitPolicy,
    pub homing_timeout_ticks: Option<u64>,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            mechanism: Mechanism::Generic,
            nudge_step: 0.0,
            limit_policy: LimitPolicy::Report,
            homing_timeout_ticks: None,
        }
    }
}

// ─── Axis ───────────────────────────────────────────────────────────

/// An axis with hardware behind it.
#[derive(Debug)]
pub struct EnabledAxis {
    controller: PositionController,
    options: AxisOptions,
    watchdog: HomingWatchdog,
    /// Last preset commanded through `set_position`.
    preset: Option<f64>,
}

impl EnabledAxis {
    pub fn new(controller: PositionController, options: AxisOptions) -> Self {
        Self {
            controller,
            watchdog: HomingWatchdog::new(options.homing_timeout_ticks),
            options,
            preset: None,
        }
    }

    #[inline]
    pub fn controller(&self) -> &PositionController {
        &self.controller
    }

    #[inline]
    pub fn controller_mut(&mut self) -> &mut PositionController {
        &mut self.controller
    }

    #[inline]
    pub fn options(&self) -> &AxisOptions {
        &self.options
    }

    /// Stop when the switch on the side we are driving toward has tripped.
    fn enforce_limit_policy(&mut self) {
        if self.options.limit_policy != LimitPolicy::Stop
            || self.controller.mode() != ControlMode::Positioning
        {
            return;
        }
        let Some(target) = self.controller.requested_position() else {
            return;
        };
        let actual = self.controller.actual_position();
        let blocked = (self.controller.is_at_upper_limit() && target > actual)
            || (self.controller.is_at_lower_limit() && target < actual);
        if blocked {
            warn!(
                axis = %self.controller.name(),
                target,
                actual,
                "Limit switch tripped in direction of travel, stopping"
            );
            self.controller.stop();
        }
    }
}

/// One mechanism axis, possibly disabled.
#[derive(Debug)]
pub enum Axis {
    Enabled(EnabledAxis),
    /// No hardware; every accessor returns its sentinel.
    Disabled { name: String, mechanism: Mechanism },
}

impl Axis {
    pub fn enabled(controller: PositionController, options: AxisOptions) -> Self {
        Self::Enabled(EnabledAxis::new(controller, options))
    }

    pub fn disabled(name: impl Into<String>, mechanism: Mechanism) -> Self {
        Self::Disabled {
            name: name.into(),
            mechanism,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Enabled(axis) => axis.controller.name(),
            Self::Disabled { name, .. } => name,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    pub fn mechanism(&self) -> Mechanism {
        match self {
            Self::Enabled(axis) => axis.options.mechanism,
            Self::Disabled { mechanism, .. } => *mechanism,
        }
    }

    /// Read-only arm view, if this axis drives an arm.
    pub fn as_arm(&self) -> Option<ArmAxis<&Axis>> {
        match self.mechanism() {
            Mechanism::Arm { retract_threshold } => Some(ArmAxis::new(self, retract_threshold)),
            _ => None,
        }
    }

    /// Arm view that also accepts commands.
    pub fn as_arm_mut(&mut self) -> Option<ArmAxis<&mut Axis>> {
        match self.mechanism() {
            Mechanism::Arm { retract_threshold } => Some(ArmAxis::new(self, retract_threshold)),
            _ => None,
        }
    }

    /// Read-only elbow view, if this axis drives an elbow.
    pub fn as_elbow(&self) -> Option<ElbowAxis<&Axis>> {
        match self.mechanism() {
            Mechanism::Elbow { safe_angle } => Some(ElbowAxis::new(self, safe_angle)),
            _ => None,
        }
    }

    /// Elbow view that also accepts commands.
    pub fn as_elbow_mut(&mut self) -> Option<ElbowAxis<&mut Axis>> {
        match self.mechanism() {
            Mechanism::Elbow { safe_angle } => Some(ElbowAxis::new(self, safe_angle)),
            _ => None,
        }
    }

    fn with_controller(&mut self, command: &str, f: impl FnOnce(&mut EnabledAxis)) {
        match self {
            Self::Enabled(axis) => f(axis),
            Self::Disabled { name, .. } => {
                debug!(axis = %name, command, "Ignoring command on disabled axis");
            }
        }
    }

    // ─── Cycle ──────────────────────────────────────────────────────

    /// Run one control cycle and publish telemetry. Disabled axes publish
    /// nothing.
    pub fn periodic(&mut self, sink: &mut dyn TelemetrySink) {
        let Self::Enabled(axis) = self else {
            return;
        };
        axis.enforce_limit_policy();
        axis.controller.update();
        axis.watchdog.check(&mut axis.controller);
        sink.publish(&axis.controller.telemetry());
    }

    // ─── Commands ───────────────────────────────────────────────────

    pub fn home(&mut self) {
        self.with_controller("home", |axis| {
            axis.watchdog.arm();
            axis.controller.home();
        });
    }

    pub fn stop(&mut self) {
        self.with_controller("stop", |axis| axis.controller.stop());
    }

    pub fn request_position(&mut self, position: f64) {
        self.with_controller("request_position", |axis| {
            axis.controller.request_position(position)
        });
    }

    pub fn clear_requested_position(&mut self) {
        self.with_controller("clear_requested_position", |axis| {
            axis.controller.clear_requested_position()
        });
    }

    pub fn set_motor_speed(&mut self, speed: f64) {
        self.with_controller("set_motor_speed", |axis| {
            axis.controller.set_motor_speed(speed)
        });
    }

    /// Request `actual + nudge_step`.
    pub fn nudge_forward(&mut self) {
        self.with_controller("nudge_forward", |axis| {
            let target = axis.controller.actual_position() + axis.options.nudge_step;
            axis.controller.request_position(target);
        });
    }

    /// Request `actual - nudge_step`.
    pub fn nudge_backward(&mut self) {
        self.with_controller("nudge_backward", |axis| {
            let target = axis.controller.actual_position() - axis.options.nudge_step;
            axis.controller.request_position(target);
        });
    }

    pub fn forget_home(&mut self) {
        self.with_controller("forget_home", |axis| axis.controller.forget_home());
    }

    /// Re-enter closed loop holding the current position.
    pub fn restore_position(&mut self) {
        self.with_controller("restore_position", |axis| {
            axis.controller.hold_position()
        });
    }

    /// Command a preset and remember it.
    pub fn set_position(&mut self, position: f64) {
        self.with_controller("set_position", |axis| {
            axis.preset = Some(position);
            axis.controller.request_position(position);
        });
    }

    /// Send the axis to its lower soft limit.
    pub fn home_position(&mut self) {
        if let Self::Enabled(axis) = self {
            let min = axis.controller.config().soft_limits().min;
            self.set_position(min);
        } else {
            self.with_controller("home_position", |_| {});
        }
    }

    // ─── Queries ────────────────────────────────────────────────────

    /// Last preset passed to `set_position`.
    pub fn position(&self) -> f64 {
        match self {
            Self::Enabled(axis) => axis.preset.unwrap_or(POSITION_UNKNOWN),
            Self::Disabled { .. } => POSITION_UNKNOWN,
        }
    }

    pub fn is_homed(&self) -> bool {
        match self {
            Self::Enabled(axis) => axis.controller.is_homed(),
            Self::Disabled { .. } => false,
        }
    }

    pub fn actual_position(&self) -> f64 {
        match self {
            Self::Enabled(axis) => axis.controller.actual_position(),
            Self::Disabled { .. } => POSITION_UNKNOWN,
        }
    }

    /// Active or queued request; `POSITION_UNKNOWN` when there is none.
    pub fn requested_position(&self) -> f64 {
        match self {
            Self::Enabled(axis) => axis
                .controller
                .requested_position()
                .unwrap_or(POSITION_UNKNOWN),
            Self::Disabled { .. } => POSITION_UNKNOWN,
        }
    }

    pub fn is_at_requested_position(&self) -> bool {
        match self {
            Self::Enabled(axis) => axis.controller.is_at_requested_position(),
            Self::Disabled { .. } => false,
        }
    }

    pub fn is_at_upper_limit(&self) -> bool {
        match self {
            Self::Enabled(axis) => axis.controller.is_at_upper_limit(),
            Self::Disabled { .. } => false,
        }
    }

    pub fn is_at_lower_limit(&self) -> bool {
        match self {
            Self::Enabled(axis) => axis.controller.is_at_lower_limit(),
            Self::Disabled { .. } => false,
        }
    }

    /// Latched homing timeout; cleared by the next `home()`.
    pub fn homing_timed_out(&self) -> bool {
        match self {
            Self::Enabled(axis) => axis.watchdog.timed_out(),
            Self::Disabled { .. } => false,
        }
    }

    pub fn mode(&self) -> Option<ControlMode> {
        match self {
            Self::Enabled(axis) => Some(axis.controller.mode()),
            Self::Disabled { .. } => None,
        }
    }

    pub fn status_string(&self) -> String {
        match self {
            Self::Enabled(axis) => axis.controller.status_string(),
            Self::Disabled { .. } => "Disabled".to_string(),
        }
    }
}
