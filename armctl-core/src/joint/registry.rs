//! Joint registry

use crate::config::{ArmConfig, JointLimits};
use crate::state::ArmError;

use super::{Angle, Pose, JOINT_COUNT};

/// Current commanded angle and limits of every joint
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JointRegistry {
    angles: Pose,
    limits: [JointLimits; JOINT_COUNT],
}

impl JointRegistry {
    /// Create a registry with every joint at the configured home pose
    pub fn new(config: &ArmConfig) -> Self {
        Self {
            angles: config.home,
            limits: config.limits,
        }
    }

    /// Current angle of a joint (0-based)
    pub fn get(&self, joint: usize) -> Result<Angle, ArmError> {
        self.angles.get(joint).copied().ok_or(ArmError::InvalidJoint)
    }

    /// Limits of a joint (0-based)
    pub fn limits(&self, joint: usize) -> Result<JointLimits, ArmError> {
        self.limits.get(joint).copied().ok_or(ArmError::InvalidJoint)
    }

    /// Snapshot of every joint angle
    pub fn pose(&self) -> Pose {
        self.angles
    }

    /// Validate an angle for a joint
    ///
    /// Takes a wide integer so out-of-range wire values are reported
    /// as-is. Returns the angle narrowed to `Angle` on success.
    pub fn check(&self, joint: usize, angle: i32) -> Result<Angle, ArmError> {
        let limits = self.limits(joint)?;
        if !limits.contains(angle) {
            return Err(ArmError::AngleOutOfRange {
                joint: joint as u8,
                angle,
                min: limits.min,
                max: limits.max,
            });
        }
        Angle::try_from(angle).map_err(|_| ArmError::AngleOutOfRange {
            joint: joint as u8,
            angle,
            min: limits.min,
            max: limits.max,
        })
    }

    /// Validate a full pose against every joint's limits
    pub fn check_pose(&self, pose: &Pose) -> Result<(), ArmError> {
        for (joint, &angle) in pose.iter().enumerate() {
            self.check(joint, i32::from(angle))?;
        }
        Ok(())
    }

    /// Record a new angle for a joint
    ///
    /// Stores the angle as given; limit checks belong to the caller.
    pub fn set(&mut self, joint: usize, angle: Angle) -> Result<(), ArmError> {
        let slot = self.angles.get_mut(joint).ok_or(ArmError::InvalidJoint)?;
        *slot = angle;
        Ok(())
    }
}
