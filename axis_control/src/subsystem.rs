//! Mechanism-level wrappers around a position controller.
//!
//! An [`Axis`] owns exactly one controller and is updated exactly once per
//! control cycle through [`Axis::periodic`]. Arm and elbow specific commands
//! live on borrowed views ([`ArmAxis`], [`ElbowAxis`]).

pub mod arm;
pub mod axis;
pub mod elbow;
pub mod watchdog;

pub use arm::ArmAxis;
pub use axis::{Axis, AxisOptions, EnabledAxis, LimitPolicy, Mechanism};
pub use elbow::ElbowAxis;
pub use watchdog::HomingWatchdog;
