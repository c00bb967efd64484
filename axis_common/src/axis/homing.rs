//! Homing types.
//!
//! Homing drives the mechanism into a physical hard stop at a fixed open-loop
//! output until either the stall current crosses a threshold or the limit
//! switch on that side reports triggered.

use serde::{Deserialize, Serialize};

/// Direction of travel toward the homing hard stop.
///
/// Safety-critical: selects both the sign of the homing output and which
/// limit switch counts as the homing-side switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum HomeDirection {
    /// Home against the reverse (lower) hard stop.
    #[default]
    Reverse = 0,
    /// Home against the forward (upper) hard stop.
    Forward = 1,
}

impl HomeDirection {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Reverse),
            1 => Some(Self::Forward),
            _ => None,
        }
    }

    /// Sign multiplier applied to the homing speed.
    #[inline]
    pub const fn sign(&self) -> f64 {
        match self {
            Self::Reverse => -1.0,
            Self::Forward => 1.0,
        }
    }
}

/// Homing parameters of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomingParams {
    /// Open-loop output magnitude while homing, in (0, 1].
    pub speed: f64,
    /// Current at or above which the motor is considered stalled [A].
    pub current_threshold_amps: f64,
    /// Side of travel to home against.
    pub direction: HomeDirection,
}

impl HomingParams {
    /// Signed output to apply every homing cycle.
    #[inline]
    pub fn output(&self) -> f64 {
        self.direction.sign() * self.speed
    }

    /// Whether a current sample indicates a stall against the hard stop.
    #[inline]
    pub fn is_stalled(&self, current_amps: f64) -> bool {
        current_amps.abs() >= self.current_threshold_amps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_direction_roundtrip() {
        assert_eq!(HomeDirection::from_u8(0), Some(HomeDirection::Reverse));
        assert_eq!(HomeDirection::from_u8(1), Some(HomeDirection::Forward));
        assert!(HomeDirection::from_u8(2).is_none());
    }

    #[test]
    fn homing_output_is_signed_toward_stop() {
        let mut params = HomingParams {
            speed: 0.2,
            current_threshold_amps: 20.0,
            direction: HomeDirection::Reverse,
        };
        assert_eq!(params.output(), -0.2);
        params.direction = HomeDirection::Forward;
        assert_eq!(params.output(), 0.2);
    }

    #[test]
    fn stall_detection_is_inclusive_and_sign_agnostic() {
        let params = HomingParams {
            speed: 0.2,
            current_threshold_amps: 20.0,
            direction: HomeDirection::Reverse,
        };
        assert!(!params.is_stalled(19.99));
        assert!(params.is_stalled(20.0));
        assert!(params.is_stalled(-25.0));
    }

    #[test]
    fn direction_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            dir: HomeDirection,
        }
        let w: Wrapper = toml::from_str("dir = \"forward\"").unwrap();
        assert_eq!(w.dir, HomeDirection::Forward);
    }
}
