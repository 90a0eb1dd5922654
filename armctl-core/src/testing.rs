//! Test doubles shared by the unit tests

use embedded_hal::delay::DelayNs;

use crate::joint::{Angle, Pose, JOINT_COUNT};
use crate::traits::{InputError, PoseInput, ServoBank, ServoError};

/// Servo bank that records the last angle written per joint
#[derive(Debug, Default)]
pub struct MockServos {
    pub angles: Pose,
    pub writes: usize,
    pub fail_joint: Option<usize>,
}

impl MockServos {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ServoBank for MockServos {
    fn set_angle(&mut self, joint: usize, angle: Angle) -> Result<(), ServoError> {
        if joint >= JOINT_COUNT {
            return Err(ServoError::NoSuchServo);
        }
        if self.fail_joint == Some(joint) {
            return Err(ServoError::Output);
        }
        self.angles[joint] = angle;
        self.writes += 1;
        Ok(())
    }
}

/// Delay that only accumulates the requested time
#[derive(Debug, Default)]
pub struct MockDelay {
    pub elapsed_ns: u64,
}

impl MockDelay {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}

/// Position input with fixed readings
#[derive(Debug)]
pub struct MockInput {
    pub raw: [u16; JOINT_COUNT],
    pub full_scale: u16,
    pub fail: bool,
}

impl MockInput {
    /// Ten-bit readings, every input at mid travel
    pub fn centered() -> Self {
        Self {
            raw: [512; JOINT_COUNT],
            full_scale: 1023,
            fail: false,
        }
    }
}

impl PoseInput for MockInput {
    fn full_scale(&self) -> u16 {
        self.full_scale
    }

    fn read_raw(&mut self, joint: usize) -> Result<u16, InputError> {
        if self.fail {
            return Err(InputError::Read);
        }
        self.raw.get(joint).copied().ok_or(InputError::Unavailable)
    }
}
