//! Actuator driver and limit switch traits.
//!
//! This module defines:
//! - `ActuatorDriver` trait - open-loop output plus position/velocity/current reads
//! - `LimitSwitch` trait - boolean hard-stop detector
//! - `DriverError` enum - read failures surfaced by a driver

use thiserror::Error;

/// Error types for driver reads.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DriverError {
    /// The sensor has no valid sample (disconnected, not yet sampled).
    #[error("Sensor unavailable: {0}")]
    Unavailable(String),

    /// Hardware communication error.
    #[error("Hardware communication error: {0}")]
    CommunicationError(String),
}

/// Capability interface for a single motor with integrated feedback.
///
/// # Contract
///
/// - All reads are cheap, non-blocking snapshots of the most recent sample.
/// - Positions and velocities are in physical units (m, deg, ...), already
///   scaled by the driver.
/// - `set_output` takes a fraction of full output; values outside [-1, 1]
///   are the caller's bug, drivers may clamp them.
///
/// | Operation | Blocking | Called from |
/// |-----------|----------|-------------|
/// | `set_output()` | No | `update()`, once per tick at most |
/// | reads | No | `update()` |
/// | `set_brake_on_idle()` / `set_inverted()` | No | bind time |
pub trait ActuatorDriver {
    /// Command open-loop output, a fraction of full scale in [-1, 1].
    fn set_output(&mut self, fraction: f64);

    /// Measured position [physical units].
    fn position(&self) -> Result<f64, DriverError>;

    /// Measured velocity [physical units / s].
    fn velocity(&self) -> Result<f64, DriverError>;

    /// Instantaneous current draw [A].
    fn current_amps(&self) -> Result<f64, DriverError>;

    /// Brake (true) or coast (false) when output is zero.
    fn set_brake_on_idle(&mut self, brake: bool);

    /// Reverse the sign convention of output and feedback on the device.
    fn set_inverted(&mut self, inverted: bool);
}

/// Capability interface for one hard-stop switch.
pub trait LimitSwitch {
    /// Whether the switch currently reports the mechanism at its stop.
    fn is_triggered(&self) -> bool;
}

/// The pair of hard-stop switches bounding one axis.
///
/// Either side may be absent; an absent switch never reports triggered.
#[derive(Default)]
pub struct LimitSwitches {
    /// Switch at the forward (upper) end of travel.
    pub forward: Option<Box<dyn LimitSwitch>>,
    /// Switch at the reverse (lower) end of travel.
    pub reverse: Option<Box<dyn LimitSwitch>>,
}

impl LimitSwitches {
    /// Both switches present.
    pub fn new(forward: Box<dyn LimitSwitch>, reverse: Box<dyn LimitSwitch>) -> Self {
        Self {
            forward: Some(forward),
            reverse: Some(reverse),
        }
    }

    /// No switches fitted; homing relies on current detection alone.
    pub fn none() -> Self {
        Self::default()
    }

    /// Forward switch triggered.
    #[inline]
    pub fn forward_triggered(&self) -> bool {
        self.forward.as_ref().is_some_and(|s| s.is_triggered())
    }

    /// Reverse switch triggered.
    #[inline]
    pub fn reverse_triggered(&self) -> bool {
        self.reverse.as_ref().is_some_and(|s| s.is_triggered())
    }
}

impl std::fmt::Debug for LimitSwitches {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LimitSwitches")
            .field("forward", &self.forward.is_some())
            .field("reverse", &self.reverse.is_some())
            .finish()
    }
}
