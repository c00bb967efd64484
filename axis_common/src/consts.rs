//! System-wide constants for the axis workspace.
//!
//! Single source of truth for default periods, limits and sentinels.

use std::time::Duration;

/// Default control loop period in milliseconds (50 Hz).
pub const DEFAULT_CONTROL_PERIOD_MS: u64 = 20;

/// Default control loop period as Duration.
pub const DEFAULT_CONTROL_PERIOD: Duration = Duration::from_millis(DEFAULT_CONTROL_PERIOD_MS);

/// Maximum number of axes a single cycle runner drives.
pub const MAX_AXES: usize = 16;

/// Position reported by a disabled axis, where no controller exists to ask.
pub const POSITION_UNKNOWN: f64 = -1.0;

/// Default homing output fraction.
pub const DEFAULT_HOMING_SPEED: f64 = 0.1;

/// Default homing stall-current threshold [A].
pub const DEFAULT_HOMING_CURRENT_AMPS: f64 = 10.0;

/// Default arrival tolerance [physical units].
pub const DEFAULT_POSITION_TOLERANCE: f64 = 0.01;

/// Default proportional gain of the closed loop.
pub const DEFAULT_KP: f64 = 1.0;
