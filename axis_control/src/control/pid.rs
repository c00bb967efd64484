//! PID position loop with backward Euler integration, integrator clamping
//! and a derivative kick guard on the first cycle after reset.
//!
//! Zero Ki disables integral; zero Kd disables derivative. Output is
//! saturated to `±out_max`, a fraction of full motor output.

use axis_common::axis::config::ClosedLoopGains;

/// Internal state of the PID loop.
///
/// Must be reset whenever the loop is (re)engaged: on entering
/// `Positioning`, on a new request, and inside the arrival deadband.
#[derive(Debug, Clone, Copy, Default)]
pub struct PidState {
    /// Integral accumulator (already multiplied by Ki).
    integral: f64,
    /// Previous position error (for derivative).
    prev_error: f64,
    /// False until the first compute after a reset.
    primed: bool,
}

impl PidState {
    /// Reset all internal state to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Current integral contribution.
    #[inline]
    pub fn integral(&self) -> f64 {
        self.integral
    }
}

/// PID gains plus the saturation bound.
#[derive(Debug, Clone, Copy)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Output saturation limit (fraction of full output).
    pub out_max: f64,
}

impl From<ClosedLoopGains> for PidGains {
    fn from(g: ClosedLoopGains) -> Self {
        Self {
            kp: g.kp,
            ki: g.ki,
            kd: g.kd,
            out_max: 1.0,
        }
    }
}

/// Compute one PID cycle.
///
/// # Arguments
/// - `state`: Mutable PID state.
/// - `gains`: Loop gains.
/// - `error`: Position error (target − actual) [physical units].
/// - `dt`: Cycle period [s].
///
/// # Returns
/// Output saturated to `[-out_max, out_max]`. Returns 0 for `dt <= 0`.
#[inline]
pub fn pid_compute(state: &mut PidState, gains: &PidGains, error: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        return 0.0;
    }

    let p_term = gains.kp * error;

    // Integrator clamped so it alone can never exceed saturation.
    let i_term = if gains.ki != 0.0 {
        state.integral =
            (state.integral + gains.ki * error * dt).clamp(-gains.out_max, gains.out_max);
        state.integral
    } else {
        state.integral = 0.0;
        0.0
    };

    // No derivative on the first cycle: prev_error is meaningless after reset.
    let d_term = if gains.kd != 0.0 && state.primed {
        gains.kd * (error - state.prev_error) / dt
    } else {
        0.0
    };

    state.prev_error = error;
    state.primed = true;

    (p_term + i_term + d_term).clamp(-gains.out_max, gains.out_max)
}

// ─── Tests ──────────────────────────────────────────────────────────
