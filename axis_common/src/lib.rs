//! Axis Common Library
//!
//! Shared types for single-axis position control: configuration and its
//! validating builder, hardware capability traits, homing types, control
//! modes and telemetry frames.
//!
//! # Module Structure
//!
//! - [`config`] - TOML loading traits, shared settings and `ConfigError`
//! - [`consts`] - Workspace-wide constants and sentinels
//! - [`axis`] - Controller configuration, homing, mode and telemetry types
//! - [`hal`] - Actuator driver and limit switch capability traits
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use axis_common::prelude::*;
//!
//! let config = ControllerConfig::builder("ARM")
//!     .soft_limits(0.0, 0.5)
//!     .homing(0.2, 20.0)
//!     .position_tolerance(0.01)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.soft_limits().max, 0.5);
//! ```

pub mod axis;
pub mod config;
pub mod consts;
pub mod hal;
pub mod prelude;
