//! Command and engine errors

use core::fmt;

use armctl_protocol::ParseError;

use crate::config::{MAX_STEP_INTERVAL_MS, MIN_STEP_INTERVAL_MS};
use crate::joint::Angle;
use crate::traits::InputError;

/// Errors reported to the host as `ERROR:<reason>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArmError {
    /// Line could not be parsed into a command
    Parse(ParseError),
    /// Joint number outside 1-6
    InvalidJoint,
    /// Sequence slot outside the store, or holding no sequence
    InvalidSlot,
    /// Target angle outside the joint's limits (`joint` is 0-based)
    AngleOutOfRange {
        joint: u8,
        angle: i32,
        min: Angle,
        max: Angle,
    },
    /// Step interval outside the accepted range
    SpeedOutOfRange(u16),
    /// Resource already in use (joint in motion, playback active, ...)
    Busy,
    /// Recording slot has no room for another point
    SequenceFull,
    /// Sequence has no points to play
    EmptySequence,
    /// `RECORD_STOP` without an active recording
    NotRecording,
    /// `TEACH_STOP` without an active teach session
    NotTeaching,
    /// Position input missing or failing
    Input(InputError),
    /// Safety interlock engaged
    EmergencyStop,
    /// Servo output write failed
    ActuatorFault,
}

impl From<ParseError> for ArmError {
    fn from(err: ParseError) -> Self {
        ArmError::Parse(err)
    }
}

impl From<InputError> for ArmError {
    fn from(err: InputError) -> Self {
        ArmError::Input(err)
    }
}

impl fmt::Display for ArmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmError::Parse(err) => write!(f, "{}", err),
            ArmError::InvalidJoint => f.write_str("Invalid joint (expected 1-6)"),
            ArmError::InvalidSlot => f.write_str("Invalid sequence slot"),
            ArmError::AngleOutOfRange {
                joint,
                angle,
                min,
                max,
            } => write!(
                f,
                "J{} angle {} out of range ({}-{})",
                joint + 1,
                angle,
                min,
                max
            ),
            ArmError::SpeedOutOfRange(value) => write!(
                f,
                "Speed {} out of range ({}-{})",
                value, MIN_STEP_INTERVAL_MS, MAX_STEP_INTERVAL_MS
            ),
            ArmError::Busy => f.write_str("Busy"),
            ArmError::SequenceFull => f.write_str("Sequence full"),
            ArmError::EmptySequence => f.write_str("Sequence empty"),
            ArmError::NotRecording => f.write_str("Not recording"),
            ArmError::NotTeaching => f.write_str("Not teaching"),
            ArmError::Input(InputError::Unavailable) => f.write_str("Position input unavailable"),
            ArmError::Input(InputError::Read) => f.write_str("Position input read failed"),
            ArmError::EmergencyStop => f.write_str("Emergency stop"),
            ArmError::ActuatorFault => f.write_str("Actuator fault"),
        }
    }
}
