//! Controller mode enum.
//!
//! Exactly one mode is active per controller at any instant. Transitions
//! happen synchronously inside a command call or a single `update()`.

use serde::{Deserialize, Serialize};

/// Operating mode of a position controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum ControlMode {
    /// Output held at zero. Initial state.
    #[default]
    Stopped = 0,
    /// Driving toward the homing hard stop at fixed open-loop output.
    Homing = 1,
    /// Closed-loop control toward the requested position.
    Positioning = 2,
    /// Open-loop output set directly by the caller.
    ManualOverride = 3,
}

impl ControlMode {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Stopped),
            1 => Some(Self::Homing),
            2 => Some(Self::Positioning),
            3 => Some(Self::ManualOverride),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Homing => "Homing",
            Self::Positioning => "Positioning",
            Self::ManualOverride => "ManualOverride",
        }
    }
}

impl std::fmt::Display for ControlMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
