//! Hard-stop homing supervision.
//!
//! The supervisor decides, once per cycle, whether the mechanism has reached
//! the homing hard stop. It does not command the motor: the position
//! controller applies the homing output while the supervisor reports
//! `InProgress`.
//!
//! | Signal | Source | Role |
//! |--------|--------|------|
//! | Stall current | `ActuatorDriver::current_amps` | Authoritative |
//! | Homing-side limit switch | `LimitSwitch::is_triggered` | Redundant, faster |
//!
//! Either signal completes homing on the cycle it is first seen. There is no
//! timeout here; callers that want one layer it on top.

use axis_common::axis::homing::HomingParams;
use axis_common::hal::driver::DriverError;

// ─── Homing Phases ──────────────────────────────────────────────────

/// Internal phase of the homing procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomingPhase {
    /// Not homing.
    Idle,
    /// Driving toward the hard stop.
    Approach,
    /// Hard stop detected.
    Complete,
}

/// Which signal detected the hard stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HomingTrigger {
    /// Current at or above threshold.
    CurrentSpike { amps: f64 },
    /// Homing-side limit switch.
    LimitSwitch,
}

/// Result of a single homing tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HomingTickResult {
    /// Keep driving at homing output.
    InProgress,
    /// Stop reached; caller must zero output and establish the reference.
    Complete { trigger: HomingTrigger },
    /// Current unreadable and no switch trigger: hold output at zero this tick.
    SensorFault,
    /// No approach running.
    Idle,
}

// ─── Homing Supervisor ──────────────────────────────────────────────

/// Per-axis homing supervisor state machine.
#[derive(Debug, Clone)]
pub struct HomingSupervisor {
    phase: HomingPhase,
    params: HomingParams,
    /// Cycles spent in `Approach` since the last `start()`.
    approach_cycles: u64,
}

impl HomingSupervisor {
    pub fn new(params: HomingParams) -> Self {
        Self {
            phase: HomingPhase::Idle,
            params,
            approach_cycles: 0,
        }
    }

    #[inline]
    pub fn phase(&self) -> HomingPhase {
        self.phase
    }

    /// Whether homing is actively running.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == HomingPhase::Approach
    }

    /// Signed open-loop output to apply while approaching.
    #[inline]
    pub fn output(&self) -> f64 {
        self.params.output()
    }

    /// Cycles evaluated since the last start.
    #[inline]
    pub fn approach_cycles(&self) -> u64 {
        self.approach_cycles
    }

    /// Begin (or restart) an approach.
    pub fn start(&mut self) {
        self.phase = HomingPhase::Approach;
        self.approach_cycles = 0;
    }

    /// Evaluate one cycle.
    ///
    /// The current sample on the first approach cycle was drawn under the
    /// output commanded before `start()`, so a spike there is ignored; only
    /// the switch can complete homing on that cycle.
    ///
    /// # Parameters
    /// - `current`: this cycle's current sample
    /// - `homing_switch`: homing-side limit switch state
    pub fn tick(
        &mut self,
        current: Result<f64, DriverError>,
        homing_switch: bool,
    ) -> HomingTickResult {
        if self.phase != HomingPhase::Approach {
            return HomingTickResult::Idle;
        }
        self.approach_cycles += 1;
        let driven = self.approach_cycles > 1;

        let trigger = match current {
            Ok(amps) if driven && self.params.is_stalled(amps) => {
                Some(HomingTrigger::CurrentSpike { amps })
            }
            _ if homing_switch => Some(HomingTrigger::LimitSwitch),
            Ok(_) => None,
            Err(_) => return HomingTickResult::SensorFault,
        };

        match trigger {
            Some(trigger) => {
                self.phase = HomingPhase::Complete;
                HomingTickResult::Complete { trigger }
            }
            None => HomingTickResult::InProgress,
        }
    }

    /// Abort or clear to idle.
    pub fn reset(&mut self) {
        self.phase = HomingPhase::Idle;
        self.approach_cycles = 0;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axis_common::axis::homing::HomeDirection;

    fn params() -> HomingParams {
        HomingParams {
            speed: 0.2,
            current_threshold_amps: 20.0,
            direction: HomeDirection::Reverse,
        }
    }

    #[test]
    fn detects_current_threshold() {
        let mut sv = HomingSupervisor::new(params());
        sv.start();

        assert_eq!(sv.tick(Ok(5.0), false), HomingTickResult::InProgress);
        assert_eq!(
            sv.tick(Ok(20.0), false),
            HomingTickResult::Complete {
                trigger: HomingTrigger::CurrentSpike { amps: 20.0 }
            }
        );
        assert_eq!(sv.phase(), HomingPhase::Complete);
        assert_eq!(sv.approach_cycles(), 2);
    }

    #[test]
    fn stall_left_over_from_before_start_is_ignored() {
        let mut sv = HomingSupervisor::new(params());
        sv.start();
        assert_eq!(sv.tick(Ok(30.0), false), HomingTickResult::InProgress);
        assert!(sv.is_active());
        assert_eq!(
            sv.tick(Ok(30.0), false),
            HomingTickResult::Complete {
                trigger: HomingTrigger::CurrentSpike { amps: 30.0 }
            }
        );

        sv.start();
        assert_eq!(sv.tick(Ok(30.0), false), HomingTickResult::InProgress);
    }

    #[test]
    fn limit_switch_alone_completes() {
        let mut sv = HomingSupervisor::new(params());
        sv.start();
        assert_eq!(
            sv.tick(Ok(1.0), true),
            HomingTickResult::Complete {
                trigger: HomingTrigger::LimitSwitch
            }
        );
    }

    #[test]
    fn switch_completes_even_without_current() {
        let mut sv = HomingSupervisor::new(params());
        sv.start();
        let err = DriverError::Unavailable("current".into());
        assert_eq!(
            sv.tick(Err(err), true),
            HomingTickResult::Complete {
                trigger: HomingTrigger::LimitSwitch
            }
        );
    }

    #[test]
    fn missing_current_is_a_fault() {
        let mut sv = HomingSupervisor::new(params());
        sv.start();
        let err = DriverError::Unavailable("current".into());
        assert_eq!(sv.tick(Err(err), false), HomingTickResult::SensorFault);
        assert!(sv.is_active());
    }

    #[test]
    fn idle_supervisor_never_completes() {
        let mut sv = HomingSupervisor::new(params());
        assert_eq!(sv.tick(Ok(100.0), true), HomingTickResult::Idle);
        assert!(!sv.is_active());

        sv.start();
        sv.tick(Ok(0.0), false);
        sv.tick(Ok(100.0), false);
        assert_eq!(sv.phase(), HomingPhase::Complete);
        assert_eq!(sv.tick(Ok(100.0), false), HomingTickResult::Idle);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut sv = HomingSupervisor::new(params());
        sv.start();
        sv.tick(Ok(1.0), false);
        sv.reset();
        assert_eq!(sv.phase(), HomingPhase::Idle);
        assert_eq!(sv.approach_cycles(), 0);
    }

    #[test]
    fn output_is_signed() {
        let sv = HomingSupervisor::new(params());
        assert_eq!(sv.output(), -0.2);
    }
}
