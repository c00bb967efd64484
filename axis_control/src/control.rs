//! Control engine root.
//!
//! Position controller state machine plus the PID loop and homing
//! supervisor it is built from.

pub mod homing;
pub mod pid;
pub mod position;

pub use position::PositionController;
