//! Servo actuator traits

use crate::joint::Angle;

/// Errors that can occur while driving a servo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoError {
    /// Angle outside what the servo can reach
    InvalidAngle,
    /// Output hardware rejected the write
    Output,
    /// No servo at the requested position in the bank
    NoSuchServo,
}

/// Trait for a single positional servo
///
/// Implementations translate an angle in degrees into whatever the
/// hardware needs (PWM pulse width, bus command, ...).
pub trait ServoDriver {
    /// Command the servo to an angle in degrees
    fn set_angle(&mut self, angle: Angle) -> Result<(), ServoError>;
}

/// Trait for the full set of servos on the arm, addressed by joint index
pub trait ServoBank {
    /// Command the servo for `joint` (0-based) to an angle
    fn set_angle(&mut self, joint: usize, angle: Angle) -> Result<(), ServoError>;
}

impl<S: ServoDriver, const N: usize> ServoBank for [S; N] {
    fn set_angle(&mut self, joint: usize, angle: Angle) -> Result<(), ServoError> {
        self.get_mut(joint)
            .ok_or(ServoError::NoSuchServo)?
            .set_angle(angle)
    }
}
