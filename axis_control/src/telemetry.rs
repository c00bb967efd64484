//! Telemetry sinks.
//!
//! | Sink | Output |
//! |------|--------|
//! | `NullSink` | discarded |
//! | `TracingSink` | `debug!` event per frame |
//! | `JsonLinesSink` | one JSON object per line |
//! | `MemorySink` | kept in memory |

use std::io::Write;

use axis_common::axis::telemetry::{AxisTelemetry, TelemetrySink};
use tracing::{debug, warn};

/// Discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn publish(&mut self, _frame: &AxisTelemetry) {}
}

/// Emits each frame as a structured `debug!` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn publish(&mut self, frame: &AxisTelemetry) {
        debug!(
            axis = %frame.axis_name,
            mode = %frame.mode,
            homed = frame.homed,
            requested = ?frame.requested_position,
            actual = frame.actual_position,
            upper = frame.at_upper_limit,
            lower = frame.at_lower_limit,
            "{}",
            frame.status_string
        );
    }
}

/// Writes frames as JSON lines.
///
/// Write errors are logged once and further frames dropped; telemetry never
/// stalls the control loop.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    failed: bool,
    written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failed: false,
            written: 0,
        }
    }

    /// Frames successfully written.
    #[inline]
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_frame(&mut self, frame: &AxisTelemetry) -> Result<(), std::io::Error> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")
    }
}

impl<W: Write> TelemetrySink for JsonLinesSink<W> {
    fn publish(&mut self, frame: &AxisTelemetry) {
        if self.failed {
            return;
        }
        match self.write_frame(frame) {
            Ok(()) => self.written += 1,
            Err(e) => {
                warn!(error = %e, "Telemetry write failed, dropping further frames");
                self.failed = true;
            }
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!(error = %e, "Telemetry flush failed");
        }
    }
}

/// Keeps every frame. Used by tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    frames: Vec<AxisTelemetry>,
}

impl MemorySink {
    pub fn frames(&self) -> &[AxisTelemetry] {
        &self.frames
    }

    /// Frames for one axis, in publish order.
    pub fn frames_for<'a>(&'a self, axis: &'a str) -> impl Iterator<Item = &'a AxisTelemetry> + 'a {
        self.frames.iter().filter(move |f| f.axis_name == axis)
    }

    pub fn last(&self) -> Option<&AxisTelemetry> {
        self.frames.last()
    }
}

impl TelemetrySink for MemorySink {
    fn publish(&mut self, frame: &AxisTelemetry) {
        self.frames.push(frame.clone());
    }
}
