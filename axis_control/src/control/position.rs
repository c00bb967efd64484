//! Position controller: one axis, one driver, one limit switch pair.
//!
//! # Per-cycle flow (`update`)
//!
//! ```text
//! refresh actual ──► fault? ──yes──► output 0
//!                      │no
//!                      ▼
//!   Stopped         → 0 (or promote a queued request once homed)
//!   Homing          → homing output until stall current / switch
//!   Positioning     → PID toward requested position, deadband at tolerance
//!   ManualOverride  → manual speed
//!                      │
//!                      ▼
//!               driver.set_output()  (exactly once)
//! ```
//!
//! Positions reported by the controller are relative to the zero reference
//! captured at the homing hard stop: `actual = raw - zero_reference`, so the
//! stop itself reads `home_offset`.

use std::sync::Arc;

use axis_common::axis::config::ControllerConfig;
use axis_common::axis::homing::HomeDirection;
use axis_common::axis::state::ControlMode;
use axis_common::axis::telemetry::AxisTelemetry;
use axis_common::hal::driver::{ActuatorDriver, LimitSwitches};
use tracing::{debug, info, warn};

use super::homing::{HomingSupervisor, HomingTickResult};
use super::pid::{PidGains, PidState, pid_compute};

/// Closed-loop position controller for a single actuator.
///
/// Commands (`home`, `request_position`, `stop`, ...) only change intent;
/// motor output is issued from [`update`](Self::update), once per cycle.
pub struct PositionController {
    config: Arc<ControllerConfig>,
    driver: Option<Box<dyn ActuatorDriver>>,
    switches: LimitSwitches,

    mode: ControlMode,
    homed: bool,
    /// Active closed-loop target; set only while `Positioning`.
    requested_position: Option<f64>,
    /// Request retained while unhomed or homing.
    queued_position: Option<f64>,
    manual_speed: f64,

    zero_reference: f64,
    last_raw: f64,
    last_known_actual: f64,
    last_known_velocity: f64,
    last_output: f64,

    homing: HomingSupervisor,
    pid: PidState,
    gains: PidGains,
    dt: f64,

    sensor_fault: bool,
    current_fault: bool,
    unbound_warned: bool,
}

impl PositionController {
    /// Controller with no hardware bound; `update()` is a zero-output no-op
    /// until [`bind`](Self::bind) is called.
    pub fn new(config: Arc<ControllerConfig>) -> Self {
        let homing = HomingSupervisor::new(config.homing());
        let gains = PidGains::from(config.gains());
        let dt = config.control_period().as_secs_f64();
        Self {
            config,
            driver: None,
            switches: LimitSwitches::none(),
            mode: ControlMode::Stopped,
            homed: false,
            requested_position: None,
            queued_position: None,
            manual_speed: 0.0,
            zero_reference: 0.0,
            last_raw: 0.0,
            last_known_actual: 0.0,
            last_known_velocity: 0.0,
            last_output: 0.0,
            homing,
            pid: PidState::default(),
            gains,
            dt,
            sensor_fault: false,
            current_fault: false,
            unbound_warned: false,
        }
    }

    /// Controller bound to its driver and switches.
    pub fn bound(
        config: Arc<ControllerConfig>,
        driver: Box<dyn ActuatorDriver>,
        switches: LimitSwitches,
    ) -> Self {
        let mut controller = Self::new(config);
        controller.bind(driver, switches);
        controller
    }

    /// Take ownership of the hardware and push the device-side settings.
    pub fn bind(&mut self, mut driver: Box<dyn ActuatorDriver>, switches: LimitSwitches) {
        driver.set_inverted(self.config.inverted());
        driver.set_brake_on_idle(self.config.brake_on_idle());
        driver.set_output(0.0);
        debug!(
            axis = %self.config.name(),
            inverted = self.config.inverted(),
            brake_on_idle = self.config.brake_on_idle(),
            "Driver bound"
        );
        self.driver = Some(driver);
        self.switches = switches;
        self.unbound_warned = false;
    }

    // ─── Cycle ──────────────────────────────────────────────────────

    /// Advance one control cycle.
    pub fn update(&mut self) {
        if self.driver.is_none() {
            if !self.unbound_warned {
                warn!(axis = %self.config.name(), "update() without a bound driver, output held at 0");
                self.unbound_warned = true;
            }
            self.last_output = 0.0;
            return;
        }

        let output = if self.refresh_actual() {
            self.step()
        } else {
            0.0
        };
        self.command(output);
    }

    /// Read position (and velocity) once; false on a position read fault.
    fn refresh_actual(&mut self) -> bool {
        let Some(driver) = self.driver.as_ref() else {
            return false;
        };
        let position = driver.position();
        let velocity = driver.velocity();

        match position {
            Ok(raw) => {
                if self.sensor_fault {
                    info!(axis = %self.config.name(), "Position feedback recovered");
                    self.sensor_fault = false;
                }
                self.last_raw = raw;
                self.last_known_actual = raw - self.zero_reference;
                if let Ok(v) = velocity {
                    self.last_known_velocity = v;
                }
                true
            }
            Err(e) => {
                if !self.sensor_fault {
                    warn!(axis = %self.config.name(), error = %e, "Position feedback lost, output held at 0");
                    self.sensor_fault = true;
                }
                false
            }
        }
    }

    fn step(&mut self) -> f64 {
        match self.mode {
            ControlMode::Stopped => match self.queued_position {
                Some(target) if self.homed => {
                    debug!(axis = %self.config.name(), target, "Promoting queued request");
                    self.enter_positioning(target);
                    self.closed_loop()
                }
                _ => 0.0,
            },
            ControlMode::Homing => self.homing_step(),
            ControlMode::Positioning => self.closed_loop(),
            ControlMode::ManualOverride => self.manual_speed,
        }
    }

    fn homing_step(&mut self) -> f64 {
        let current = match self.driver.as_ref() {
            Some(driver) => driver.current_amps(),
            None => return 0.0,
        };
        let switch = self.homing_side_switch();

        let result = self.homing.tick(current, switch);
        if self.current_fault && result != HomingTickResult::SensorFault {
            info!(axis = %self.config.name(), "Current feedback recovered");
            self.current_fault = false;
        }

        match result {
            HomingTickResult::InProgress => self.homing.output(),
            HomingTickResult::Complete { trigger } => {
                let offset = self.config.home_offset();
                self.zero_reference = self.last_raw - offset;
                self.last_known_actual = offset;
                self.homed = true;
                self.homing.reset();
                self.pid.reset();
                self.mode = ControlMode::Stopped;
                info!(
                    axis = %self.config.name(),
                    ?trigger,
                    zero_reference = self.zero_reference,
                    "Homing complete"
                );
                0.0
            }
            HomingTickResult::Idle => {
                self.mode = ControlMode::Stopped;
                0.0
            }
            HomingTickResult::SensorFault => {
                if !self.current_fault {
                    warn!(axis = %self.config.name(), "Current feedback lost while homing, output held at 0");
                    self.current_fault = true;
                }
                0.0
            }
        }
    }

    fn closed_loop(&mut self) -> f64 {
        let Some(target) = self.requested_position else {
            self.mode = ControlMode::Stopped;
            return 0.0;
        };
        let error = target - self.last_known_actual;
        if error.abs() <= self.config.position_tolerance() {
            self.pid.reset();
            return 0.0;
        }
        pid_compute(&mut self.pid, &self.gains, error, self.dt)
    }

    fn command(&mut self, output: f64) {
        if let Some(driver) = self.driver.as_mut() {
            driver.set_output(output);
        }
        self.last_output = output;
    }

    fn homing_side_switch(&self) -> bool {
        match self.config.homing().direction {
            HomeDirection::Reverse => self.switches.reverse_triggered(),
            HomeDirection::Forward => self.switches.forward_triggered(),
        }
    }

    fn enter_positioning(&mut self, target: f64) {
        self.requested_position = Some(target);
        self.queued_position = None;
        self.pid.reset();
        if self.mode != ControlMode::Positioning {
            debug!(axis = %self.config.name(), from = %self.mode, "→ Positioning");
            self.mode = ControlMode::Positioning;
        }
    }

    // ─── Commands ───────────────────────────────────────────────────

    /// Start (or restart) homing.
    pub fn home(&mut self) {
        if let Some(active) = self.requested_position.take() {
            self.queued_position = Some(active);
        }
        self.manual_speed = 0.0;
        self.pid.reset();
        self.homing.start();
        self.mode = ControlMode::Homing;
        info!(
            axis = %self.config.name(),
            direction = ?self.config.homing().direction,
            speed = self.config.homing().speed,
            "Homing started"
        );
    }

    /// Request a closed-loop move. The target is clamped into the soft
    /// limits; NaN and infinities are ignored.
    ///
    /// While unhomed (or homing) the request is retained and acted on once
    /// homing completes.
    pub fn request_position(&mut self, position: f64) {
        if !position.is_finite() {
            warn!(axis = %self.config.name(), position, "Ignoring non-finite position request");
            return;
        }
        let target = self.config.soft_limits().clamp(position);

        if self.homed && self.mode != ControlMode::Homing {
            self.manual_speed = 0.0;
            self.enter_positioning(target);
            return;
        }

        self.requested_position = None;
        self.queued_position = Some(target);
        if self.mode == ControlMode::ManualOverride {
            self.manual_speed = 0.0;
            self.mode = ControlMode::Stopped;
        }
        debug!(axis = %self.config.name(), target, "Request queued until homed");
    }

    /// Drop any active or queued request.
    pub fn clear_requested_position(&mut self) {
        self.requested_position = None;
        self.queued_position = None;
        if self.mode == ControlMode::Positioning {
            self.mode = ControlMode::Stopped;
            debug!(axis = %self.config.name(), "Request cleared → Stopped");
        }
    }

    /// Hold still at the current position. No-op while unhomed.
    pub fn hold_position(&mut self) {
        if self.homed {
            self.request_position(self.last_known_actual);
        }
    }

    /// Cancel everything; output is 0 from the next `update()`.
    pub fn stop(&mut self) {
        if self.mode != ControlMode::Stopped {
            debug!(axis = %self.config.name(), from = %self.mode, "→ Stopped");
        }
        self.mode = ControlMode::Stopped;
        self.requested_position = None;
        self.queued_position = None;
        self.manual_speed = 0.0;
        self.homing.reset();
        self.pid.reset();
        self.current_fault = false;
    }

    /// Open-loop manual drive, bypassing the position loop. Clamped to
    /// [-1, 1]; NaN drives at 0.
    pub fn set_motor_speed(&mut self, speed: f64) {
        let speed = if speed.is_nan() {
            0.0
        } else {
            speed.clamp(-1.0, 1.0)
        };
        if self.mode != ControlMode::ManualOverride {
            debug!(axis = %self.config.name(), from = %self.mode, speed, "→ ManualOverride");
        }
        self.requested_position = None;
        self.queued_position = None;
        self.homing.reset();
        self.pid.reset();
        self.manual_speed = speed;
        self.mode = ControlMode::ManualOverride;
    }

    /// Discard the zero reference; the axis must be re-homed before any
    /// closed-loop motion.
    pub fn forget_home(&mut self) {
        self.homed = false;
        self.requested_position = None;
        self.queued_position = None;
        self.manual_speed = 0.0;
        self.homing.reset();
        self.pid.reset();
        self.mode = ControlMode::Stopped;
        info!(axis = %self.config.name(), "Home forgotten");
    }

    // ─── Queries ────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.config.name()
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.driver.is_some()
    }

    #[inline]
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    #[inline]
    pub fn is_homed(&self) -> bool {
        self.homed
    }

    /// Active request, else the queued one.
    #[inline]
    pub fn requested_position(&self) -> Option<f64> {
        self.requested_position.or(self.queued_position)
    }

    /// Last position read, relative to the zero reference.
    #[inline]
    pub fn actual_position(&self) -> f64 {
        self.last_known_actual
    }

    #[inline]
    pub fn actual_velocity(&self) -> f64 {
        self.last_known_velocity
    }

    /// Output sent on the most recent `update()`.
    #[inline]
    pub fn last_output(&self) -> f64 {
        self.last_output
    }

    /// Position (or, while homing, current) feedback currently unavailable.
    #[inline]
    pub fn has_sensor_fault(&self) -> bool {
        self.sensor_fault || self.current_fault
    }

    /// Cycles spent in the current homing attempt.
    #[inline]
    pub fn homing_cycles(&self) -> u64 {
        self.homing.approach_cycles()
    }

    pub fn is_at_requested_position(&self) -> bool {
        match (self.mode, self.requested_position) {
            (ControlMode::Positioning, Some(target)) if self.homed => {
                (self.last_known_actual - target).abs() <= self.config.position_tolerance()
            }
            _ => false,
        }
    }

    #[inline]
    pub fn is_at_upper_limit(&self) -> bool {
        self.switches.forward_triggered()
    }

    #[inline]
    pub fn is_at_lower_limit(&self) -> bool {
        self.switches.reverse_triggered()
    }

    /// Diagnostic one-liner. Not for control decisions.
    pub fn status_string(&self) -> String {
        let requested = match self.requested_position() {
            Some(p) => format!("{p:.3}"),
            None => "none".to_string(),
        };
        format!(
            "{} homed={} req={} act={:.3}",
            self.mode, self.homed, requested, self.last_known_actual
        )
    }

    /// Telemetry frame for the current state.
    pub fn telemetry(&self) -> AxisTelemetry {
        AxisTelemetry {
            axis_name: self.config.name().to_string(),
            mode: self.mode,
            homed: self.homed,
            requested_position: self.requested_position(),
            actual_position: self.last_known_actual,
            at_upper_limit: self.is_at_upper_limit(),
            at_lower_limit: self.is_at_lower_limit(),
            status_string: self.status_string(),
        }
    }
}

impl std::fmt::Debug for PositionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionController")
            .field("axis", &self.config.name())
            .field("mode", &self.mode)
            .field("homed", &self.homed)
            .field("requested_position", &self.requested_position)
            .field("queued_position", &self.queued_position)
            .field("actual", &self.last_known_actual)
            .field("bound", &self.driver.is_some())
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
