//! Hardware capability interfaces.
//!
//! The position controller consumes motors, encoders, current sensors and
//! limit switches only through the small traits in [`driver`]. All
//! hardware-specific setup (PID gains on the device, encoder scaling, current
//! limiting) is driver-side configuration applied before a controller binds.

pub mod driver;
