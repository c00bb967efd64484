//! Telemetry frame published once per tick per axis.
//!
//! Telemetry is observational only: nothing read back from a sink feeds
//! control decisions.

use serde::{Deserialize, Serialize};

use super::state::ControlMode;

/// Snapshot of one axis after its `update()` for the tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTelemetry {
    /// Axis name from the controller configuration.
    pub axis_name: String,
    /// Mode after the update.
    pub mode: ControlMode,
    /// Whether a zero reference is established.
    pub homed: bool,
    /// Active or queued request, if any.
    pub requested_position: Option<f64>,
    /// Last position read from the driver.
    pub actual_position: f64,
    /// Forward limit switch triggered.
    pub at_upper_limit: bool,
    /// Reverse limit switch triggered.
    pub at_lower_limit: bool,
    /// Human-readable status line.
    pub status_string: String,
}

/// Write-only consumer of telemetry frames.
///
/// Called from the control loop, so implementations must not block.
pub trait TelemetrySink {
    /// Record one frame.
    fn publish(&mut self, frame: &AxisTelemetry);

    /// Flush buffered output, if any. Called once at shutdown.
    fn flush(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_serializes_with_stable_field_names() {
        let frame = AxisTelemetry {
            axis_name: "ARM".to_string(),
            mode: ControlMode::Positioning,
            homed: true,
            requested_position: Some(0.5),
            actual_position: 0.495,
            at_upper_limit: false,
            at_lower_limit: false,
            status_string: "Positioning".to_string(),
        };
        let text = toml::to_string(&frame).unwrap();
        assert!(text.contains("axis_name = \"ARM\""));
        assert!(text.contains("mode = \"Positioning\""));
        assert!(text.contains("requested_position = 0.5"));
    }
}
