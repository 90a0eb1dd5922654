//! Configuration type definitions
//!
//! The arm configuration is fixed at boot. The firmware embeds it as
//! postcard-serialized binary data produced at build time.

use core::fmt;

use crate::joint::{Angle, Pose, JOINT_COUNT};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest angle a hobby servo can be commanded to
pub const SERVO_MAX_ANGLE: Angle = 180;

/// Step interval bounds accepted by `SET_SPEED` (ms per degree)
pub const MIN_STEP_INTERVAL_MS: u16 = 5;
pub const MAX_STEP_INTERVAL_MS: u16 = 200;
pub const DEFAULT_STEP_INTERVAL_MS: u16 = 50;

/// Default per-joint limits (base, shoulder, elbow, wrist pitch, wrist roll, gripper)
pub const DEFAULT_JOINT_MIN: Pose = [0, 30, 0, 0, 0, 90];
pub const DEFAULT_JOINT_MAX: Pose = [180, 150, 180, 180, 180, 180];

/// Default home pose
pub const DEFAULT_HOME_POSE: Pose = [92, 85, 45, 108, 80, 152];

/// Check a step interval against the accepted range
pub fn step_interval_in_range(interval_ms: u16) -> bool {
    (MIN_STEP_INTERVAL_MS..=MAX_STEP_INTERVAL_MS).contains(&interval_ms)
}

/// Inclusive angle range for one joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointLimits {
    pub min: Angle,
    pub max: Angle,
}

impl JointLimits {
    pub const fn new(min: Angle, max: Angle) -> Self {
        Self { min, max }
    }

    /// Check whether an angle lies within the limits
    pub fn contains(&self, angle: i32) -> bool {
        (i32::from(self.min)..=i32::from(self.max)).contains(&angle)
    }
}

/// Arm configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArmConfig {
    /// Per-joint angle limits
    pub limits: [JointLimits; JOINT_COUNT],
    /// Pose the arm boots into and returns to on `HOME`
    pub home: Pose,
    /// Initial step interval (ms per degree)
    pub step_interval_ms: u16,
    /// Serial link baud rate
    pub baud_rate: u32,
}

impl Default for ArmConfig {
    fn default() -> Self {
        let mut limits = [JointLimits::new(0, SERVO_MAX_ANGLE); JOINT_COUNT];
        for (i, limit) in limits.iter_mut().enumerate() {
            *limit = JointLimits::new(DEFAULT_JOINT_MIN[i], DEFAULT_JOINT_MAX[i]);
        }
        Self {
            limits,
            home: DEFAULT_HOME_POSE,
            step_interval_ms: DEFAULT_STEP_INTERVAL_MS,
            baud_rate: armctl_protocol::DEFAULT_BAUD_RATE,
        }
    }
}

impl ArmConfig {
    /// Compact pose with every joint at its lower limit
    pub fn fold_pose(&self) -> Pose {
        let mut pose = [0; JOINT_COUNT];
        for (angle, limit) in pose.iter_mut().zip(self.limits.iter()) {
            *angle = limit.min;
        }
        pose
    }

    /// Check the configuration for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, limit) in self.limits.iter().enumerate() {
            let joint = i as u8;
            if limit.min < 0 || limit.max > SERVO_MAX_ANGLE {
                return Err(ConfigError::LimitsOutsideServoRange { joint });
            }
            if limit.min > limit.max {
                return Err(ConfigError::InvertedLimits { joint });
            }
            if !limit.contains(i32::from(self.home[i])) {
                return Err(ConfigError::HomeOutOfRange { joint });
            }
        }
        if !step_interval_in_range(self.step_interval_ms) {
            return Err(ConfigError::StepIntervalOutOfRange);
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::InvalidBaudRate);
        }
        Ok(())
    }

    /// Decode a postcard blob and validate the result
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Joint limits reach outside 0-180
    LimitsOutsideServoRange { joint: u8 },
    /// Joint minimum greater than maximum
    InvertedLimits { joint: u8 },
    /// Home angle outside the joint's limits
    HomeOutOfRange { joint: u8 },
    /// Step interval outside 5-200 ms
    StepIntervalOutOfRange,
    /// Baud rate of zero
    InvalidBaudRate,
    /// Blob could not be decoded
    Deserialize,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LimitsOutsideServoRange { joint } => {
                write!(f, "J{} limits outside 0-{}", joint + 1, SERVO_MAX_ANGLE)
            }
            ConfigError::InvertedLimits { joint } => write!(f, "J{} min above max", joint + 1),
            ConfigError::HomeOutOfRange { joint } => {
                write!(f, "J{} home angle outside limits", joint + 1)
            }
            ConfigError::StepIntervalOutOfRange => write!(
                f,
                "step interval outside {}-{} ms",
                MIN_STEP_INTERVAL_MS, MAX_STEP_INTERVAL_MS
            ),
            ConfigError::InvalidBaudRate => f.write_str("baud rate must be non-zero"),
            ConfigError::Deserialize => f.write_str("config blob could not be decoded"),
        }
    }
}
