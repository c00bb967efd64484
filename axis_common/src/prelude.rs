//! Prelude module for common re-exports.
//!
//! `use axis_common::prelude::*;` brings in the types needed to configure a
//! controller and bind it to hardware.

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::axis::config::{AxisSettings, ClosedLoopGains, ControllerConfig, SoftLimits};
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── Axis types ─────────────────────────────────────────────────────
pub use crate::axis::homing::HomeDirection;
pub use crate::axis::state::ControlMode;
pub use crate::axis::telemetry::{AxisTelemetry, TelemetrySink};

// ─── Hardware capabilities ──────────────────────────────────────────
pub use crate::hal::driver::{ActuatorDriver, DriverError, LimitSwitch, LimitSwitches};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{DEFAULT_CONTROL_PERIOD, POSITION_UNKNOWN};
