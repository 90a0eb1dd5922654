//! Actuation context
//!
//! Every servo write goes through `Arm`, which keeps the registry in
//! step with the hardware and raises the interlock when a write fails.

use crate::config::ArmConfig;
use crate::safety::{SafetyInterlock, StopCause};
use crate::state::ArmError;
use crate::traits::ServoBank;

use super::{Angle, JointRegistry, Pose};

/// Joints, servos and interlock of the arm
#[derive(Debug)]
pub struct Arm<B> {
    joints: JointRegistry,
    servos: B,
    interlock: SafetyInterlock,
}

impl<B> Arm<B> {
    /// Create the arm context with the registry at the home pose
    ///
    /// Servos are not written until `sync` is called.
    pub fn new(config: &ArmConfig, servos: B) -> Self {
        Self {
            joints: JointRegistry::new(config),
            servos,
            interlock: SafetyInterlock::new(),
        }
    }

    pub fn joints(&self) -> &JointRegistry {
        &self.joints
    }

    pub fn interlock(&self) -> &SafetyInterlock {
        &self.interlock
    }

    pub fn interlock_mut(&mut self) -> &mut SafetyInterlock {
        &mut self.interlock
    }

    pub fn servos(&self) -> &B {
        &self.servos
    }

    pub fn servos_mut(&mut self) -> &mut B {
        &mut self.servos
    }
}

impl<B: ServoBank> Arm<B> {
    /// Write one joint angle to its servo and record it
    ///
    /// A failed write raises the interlock with `ActuatorFault`; the
    /// registry keeps the last angle the servo accepted.
    pub fn actuate(&mut self, joint: usize, angle: Angle) -> Result<(), ArmError> {
        self.joints.check(joint, i32::from(angle))?;
        if self.servos.set_angle(joint, angle).is_err() {
            self.interlock.engage(StopCause::ActuatorFault);
            return Err(ArmError::ActuatorFault);
        }
        self.joints.set(joint, angle)
    }

    /// Write a full pose, after validating every joint
    pub fn apply_pose(&mut self, pose: &Pose) -> Result<(), ArmError> {
        self.joints.check_pose(pose)?;
        for (joint, &angle) in pose.iter().enumerate() {
            self.actuate(joint, angle)?;
        }
        Ok(())
    }

    /// Write the registry's current pose to every servo
    pub fn sync(&mut self) -> Result<(), ArmError> {
        let pose = self.joints.pose();
        self.apply_pose(&pose)
    }
}
