//! Homing timeout layered outside the controller.

use axis_common::axis::state::ControlMode;
use tracing::error;

use crate::control::PositionController;

/// Stops an axis whose homing attempt runs longer than a tick budget.
///
/// Latches `timed_out` until the next [`arm`](Self::arm).
#[derive(Debug, Clone, Default)]
pub struct HomingWatchdog {
    timeout_ticks: Option<u64>,
    timed_out: bool,
}

impl HomingWatchdog {
    pub fn new(timeout_ticks: Option<u64>) -> Self {
        Self {
            timeout_ticks,
            timed_out: false,
        }
    }

    #[inline]
    pub fn timeout_ticks(&self) -> Option<u64> {
        self.timeout_ticks
    }

    #[inline]
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Clear the latch; called when a new homing attempt starts.
    pub fn arm(&mut self) {
        self.timed_out = false;
    }

    /// Inspect the controller after its update. Returns true when it
    /// fired on this call.
    pub fn check(&mut self, controller: &mut PositionController) -> bool {
        let Some(limit) = self.timeout_ticks else {
            return false;
        };
        if controller.mode() != ControlMode::Homing || controller.homing_cycles() < limit {
            return false;
        }

        error!(
            axis = %controller.name(),
            ticks = controller.homing_cycles(),
            limit,
            "Homing timed out, stopping axis"
        );
        controller.stop();
        self.timed_out = true;
        true
    }
}
