//! # Axis Control Library
//!
//! Closed-loop control of single-axis robot mechanisms (an extending arm, a
//! pivoting elbow) whose absolute position is unknown at power-up.
//!
//! ## Layers
//!
//! 1. **PositionController**: per-axis state machine: homing against a hard
//!    stop, soft-limited closed-loop positioning, manual override.
//! 2. **Axis**: owns one controller, exposes mechanism-named commands, adds
//!    the homing watchdog and limit policy, republishes telemetry.
//! 3. **CycleRunner**: fixed-period loop updating every axis exactly once
//!    per tick.
//!
//! ## Single-Threaded Loop
//!
//! Nothing here locks or blocks. Every sensor read is a snapshot of the
//! latest sample and each controller issues at most one output per tick.

pub mod config;
pub mod control;
pub mod cycle;
pub mod sim;
pub mod subsystem;
pub mod telemetry;
