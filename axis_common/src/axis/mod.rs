//! Single-axis shared types.
//!
//! Everything a position controller, its owning subsystem and a telemetry
//! consumer need to agree on lives here. Organized by domain: controller
//! configuration, homing parameters, control modes and telemetry frames.

pub mod config;
pub mod homing;
pub mod state;
pub mod telemetry;
