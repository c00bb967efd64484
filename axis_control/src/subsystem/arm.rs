//! Telescoping arm view.

use std::ops::{Deref, DerefMut};

use super::axis::Axis;

/// Default arm nudge [m].
pub const ARM_NUDGE_STEP: f64 = 0.05;

/// Default extension below which the arm counts as retracted [m].
pub const ARM_RETRACT_THRESHOLD: f64 = 0.05;

/// Arm-specific commands over an [`Axis`].
///
/// Borrowed shared by [`Axis::as_arm`] for queries, exclusively by
/// [`Axis::as_arm_mut`] for commands.
#[derive(Debug)]
pub struct ArmAxis<A> {
    axis: A,
    retract_threshold: f64,
}

impl<A: Deref<Target = Axis>> ArmAxis<A> {
    pub fn new(axis: A, retract_threshold: f64) -> Self {
        Self {
            axis,
            retract_threshold,
        }
    }

    /// Homed and below the retract threshold. False when disabled.
    pub fn is_arm_retracted(&self) -> bool {
        self.axis.is_homed() && self.axis.actual_position() < self.retract_threshold
    }

    #[inline]
    pub fn axis(&self) -> &Axis {
        &self.axis
    }
}

impl<A: DerefMut<Target = Axis>> ArmAxis<A> {
    pub fn nudge_arm_forward(&mut self) {
        self.axis.nudge_forward();
    }

    pub fn nudge_arm_backwards(&mut self) {
        self.axis.nudge_backward();
    }

    #[inline]
    pub fn axis_mut(&mut self) -> &mut Axis {
        &mut self.axis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsystem::axis::{AxisOptions, Mechanism};

    #[test]
    fn disabled_arm_is_never_retracted() {
        let mut axis = Axis::disabled(
            "ARM",
            Mechanism::Arm {
                retract_threshold: 0.1,
            },
        );
        let mut arm = axis.as_arm_mut().unwrap();
        arm.nudge_arm_forward();
        assert!(!arm.is_arm_retracted());
        assert!(!axis.as_arm().unwrap().is_arm_retracted());
    }

    #[test]
    fn only_arm_axes_have_arm_view() {
        let mut axis = Axis::disabled("ELBOW", Mechanism::Elbow { safe_angle: 30.0 });
        assert!(axis.as_arm().is_none());
        assert!(axis.as_arm_mut().is_none());
        assert!(AxisOptions::default().mechanism == Mechanism::Generic);
    }
}
