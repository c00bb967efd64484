//! Elbow joint view.

use std::ops::{Deref, DerefMut};

use super::axis::Axis;

/// Default elbow nudge [deg].
pub const ELBOW_NUDGE_STEP: f64 = 1.5;

/// Default angle above which the arm may extend [deg].
pub const ELBOW_SAFE_ANGLE: f64 = 30.0;

/// Elbow-specific commands over an [`Axis`].
#[derive(Debug)]
pub struct ElbowAxis<A> {
    axis: A,
    safe_angle: f64,
}

impl<A: Deref<Target = Axis>> ElbowAxis<A> {
    pub fn new(axis: A, safe_angle: f64) -> Self {
        Self { axis, safe_angle }
    }

    /// Homed and raised past the safe angle. An unhomed angle is not
    /// trusted, so this is false before homing, after `forget_home` and
    /// when disabled.
    pub fn is_safe_to_extend_arm(&self) -> bool {
        self.axis.is_homed() && self.axis.actual_position() > self.safe_angle
    }

    #[inline]
    pub fn axis(&self) -> &Axis {
        &self.axis
    }
}

impl<A: DerefMut<Target = Axis>> ElbowAxis<A> {
    pub fn nudge_elbow_up(&mut self) {
        self.axis.nudge_forward();
    }

    pub fn nudge_elbow_down(&mut self) {
        self.axis.nudge_backward();
    }

    /// Re-enter closed loop at the current angle.
    pub fn restore_position(&mut self) {
        self.axis.restore_position();
    }

    #[inline]
    pub fn axis_mut(&mut self) -> &mut Axis {
        &mut self.axis
    }
}
