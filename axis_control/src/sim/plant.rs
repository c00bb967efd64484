//! Single-axis plant physics.
//!
//! First-order model: velocity follows output instantly
//! (`velocity = output * max_speed`), position integrates velocity and is
//! pinned at the physical hard stops. Driving into a stop draws stall
//! current.
//!
//! Plant state is kept in the mechanism frame: stops and switches sit at
//! fixed mechanism positions. A motor mounted reversed (`motor_reversed`)
//! moves the mechanism backwards for positive motor output, and its encoder
//! counts backwards too. The driver's inversion flag flips the commanded
//! output and the reported position and velocity, so a driver configured
//! with `inverted == motor_reversed` reports in the mechanism frame.

use std::time::Duration;

use axis_common::consts::DEFAULT_CONTROL_PERIOD;
use serde::Deserialize;
use tracing::trace;

/// Physical parameters of a simulated axis.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Lower hard stop [units].
    pub min_stop: f64,
    /// Upper hard stop [units].
    pub max_stop: f64,
    /// Position at power-up [units].
    pub start_position: f64,
    /// Speed at full output [units/s].
    pub max_speed: f64,
    /// Current drawn while pushing into a stop [A].
    pub stall_current_amps: f64,
    /// Current drawn at full output in free motion [A].
    pub free_current_amps: f64,
    /// Motor mounted so positive motor output retracts the mechanism.
    pub motor_reversed: bool,
    /// Integration step per commanded output.
    #[serde(skip)]
    pub dt: Duration,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            min_stop: 0.0,
            max_stop: 1.0,
            start_position: 0.5,
            max_speed: 0.5,
            stall_current_amps: 30.0,
            free_current_amps: 2.0,
            motor_reversed: false,
            dt: DEFAULT_CONTROL_PERIOD,
        }
    }
}

/// Readings the test harness has pinned, bypassing the physics.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Overrides {
    pub current: Option<f64>,
    pub forward_switch: Option<bool>,
    pub reverse_switch: Option<bool>,
    pub position_fault: bool,
    pub current_fault: bool,
}

/// Simulated mechanism state.
#[derive(Debug, Clone)]
pub struct SimPlant {
    params: SimParams,
    position: f64,
    velocity: f64,
    output: f64,
    current: f64,
    inverted: bool,
    brake_on_idle: bool,
    steps: u64,
    pub(crate) overrides: Overrides,
}

impl SimPlant {
    pub fn new(params: SimParams) -> Self {
        let position = params.start_position.clamp(params.min_stop, params.max_stop);
        Self {
            params,
            position,
            velocity: 0.0,
            output: 0.0,
            current: 0.0,
            inverted: false,
            brake_on_idle: false,
            steps: 0,
            overrides: Overrides::default(),
        }
    }

    /// Sign from driver output (and back from mechanism readings): the
    /// driver inversion flag combined with the motor mounting.
    #[inline]
    fn direction(&self) -> f64 {
        if self.inverted != self.params.motor_reversed {
            -1.0
        } else {
            1.0
        }
    }

    /// Apply driver `output` for one integration step.
    pub fn step(&mut self, output: f64) {
        let output = if output.is_nan() {
            0.0
        } else {
            output.clamp(-1.0, 1.0)
        };
        let drive = output * self.direction();
        let dt = self.params.dt.as_secs_f64();
        let velocity = drive * self.params.max_speed;
        let unclamped = self.position + velocity * dt;
        let pinned = unclamped <= self.params.min_stop && drive < 0.0
            || unclamped >= self.params.max_stop && drive > 0.0;

        self.position = unclamped.clamp(self.params.min_stop, self.params.max_stop);
        self.velocity = if pinned { 0.0 } else { velocity };
        self.current = if pinned {
            self.params.stall_current_amps
        } else {
            output.abs() * self.params.free_current_amps
        };
        self.output = output;
        self.steps += 1;

        trace!(
            position = self.position,
            velocity = self.velocity,
            current = self.current,
            pinned,
            "Plant step"
        );
    }

    #[inline]
    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Mechanism position [units].
    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Position as the driver reports it.
    #[inline]
    pub fn reported_position(&self) -> f64 {
        self.position * self.direction()
    }

    /// Velocity as the driver reports it.
    #[inline]
    pub fn reported_velocity(&self) -> f64 {
        self.velocity * self.direction()
    }

    /// Move the mechanism without physics.
    pub fn set_position(&mut self, position: f64) {
        self.position = position.clamp(self.params.min_stop, self.params.max_stop);
        self.velocity = 0.0;
    }

    /// Mechanism velocity [units/s].
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current reading, override first.
    #[inline]
    pub fn current(&self) -> f64 {
        self.overrides.current.unwrap_or(self.current)
    }

    /// Last driver output, before inversion.
    #[inline]
    pub fn output(&self) -> f64 {
        self.output
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn forward_switch(&self) -> bool {
        self.overrides
            .forward_switch
            .unwrap_or(self.position >= self.params.max_stop)
    }

    pub fn reverse_switch(&self) -> bool {
        self.overrides
            .reverse_switch
            .unwrap_or(self.position <= self.params.min_stop)
    }

    #[inline]
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    #[inline]
    pub fn brake_on_idle(&self) -> bool {
        self.brake_on_idle
    }

    pub fn set_brake_on_idle(&mut self, brake: bool) {
        self.brake_on_idle = brake;
    }
}
