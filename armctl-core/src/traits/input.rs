//! Operator position input
//!
//! Teach mode reads one analog channel per joint (typically a
//! potentiometer on a scale model of the arm) and maps each reading
//! onto that joint's limits.

use crate::joint::JOINT_COUNT;

/// Errors that can occur while sampling position inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// No position input is fitted
    Unavailable,
    /// Conversion failed
    Read,
}

/// Trait for one raw position reading per joint
pub trait PoseInput {
    /// Reading that corresponds to a joint's maximum angle
    fn full_scale(&self) -> u16;

    /// Sample the input for `joint` (0-based)
    fn read_raw(&mut self, joint: usize) -> Result<u16, InputError>;

    /// Sample every joint, base first
    fn read_all(&mut self) -> Result<[u16; JOINT_COUNT], InputError> {
        let mut readings = [0; JOINT_COUNT];
        for (joint, reading) in readings.iter_mut().enumerate() {
            *reading = self.read_raw(joint)?;
        }
        Ok(readings)
    }
}

/// Stand-in for boards without position inputs
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl PoseInput for NoInput {
    fn full_scale(&self) -> u16 {
        0
    }

    fn read_raw(&mut self, _joint: usize) -> Result<u16, InputError> {
        Err(InputError::Unavailable)
    }
}
