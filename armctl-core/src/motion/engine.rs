//! Non-blocking joint motion
//!
//! Each requested move becomes a `MotionState` that advances the joint
//! one degree per step interval. `tick` is called from the control loop
//! with a millisecond timestamp; all elapsed-time arithmetic wraps, so
//! the `u32` clock rolling over is harmless.

use embedded_hal::delay::DelayNs;

use crate::config::step_interval_in_range;
use crate::joint::{Angle, Arm, Pose, JOINT_COUNT};
use crate::state::{ArmError, Event};
use crate::traits::ServoBank;

/// Direction a joint steps in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepDirection {
    Increasing,
    Decreasing,
}

impl StepDirection {
    fn between(from: Angle, to: Angle) -> Self {
        if to >= from {
            StepDirection::Increasing
        } else {
            StepDirection::Decreasing
        }
    }

    /// Signed one-degree step
    pub fn delta(self) -> Angle {
        match self {
            StepDirection::Increasing => 1,
            StepDirection::Decreasing => -1,
        }
    }
}

/// In-flight motion of a single joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionState {
    pub target: Angle,
    pub current: Angle,
    pub direction: StepDirection,
    pub last_step_ms: u32,
}

/// Per-joint incremental motion engine
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionEngine {
    motions: [Option<MotionState>; JOINT_COUNT],
    step_interval_ms: u16,
}

impl MotionEngine {
    /// Create an idle engine
    pub fn new(step_interval_ms: u16) -> Self {
        Self {
            motions: [None; JOINT_COUNT],
            step_interval_ms,
        }
    }

    pub fn step_interval_ms(&self) -> u16 {
        self.step_interval_ms
    }

    /// Change the step interval
    ///
    /// Applies to motions already in flight from their next step.
    pub fn set_step_interval(&mut self, interval_ms: u16) -> Result<(), ArmError> {
        if !step_interval_in_range(interval_ms) {
            return Err(ArmError::SpeedOutOfRange(interval_ms));
        }
        self.step_interval_ms = interval_ms;
        Ok(())
    }

    /// Check if any joint is moving
    pub fn is_active(&self) -> bool {
        self.motions.iter().any(Option::is_some)
    }

    /// Check if a specific joint is moving
    pub fn is_joint_active(&self, joint: usize) -> bool {
        matches!(self.motions.get(joint), Some(Some(_)))
    }

    /// In-flight motion of a joint
    pub fn motion(&self, joint: usize) -> Option<&MotionState> {
        self.motions.get(joint).and_then(Option::as_ref)
    }

    /// Pose the arm will reach once every in-flight motion finishes
    pub fn planned_pose(&self, current: &Pose) -> Pose {
        let mut pose = *current;
        for (angle, motion) in pose.iter_mut().zip(self.motions.iter()) {
            if let Some(m) = motion {
                *angle = m.target;
            }
        }
        pose
    }

    /// Start moving one joint toward `target`
    ///
    /// A target equal to the current angle is accepted and starts
    /// nothing. The joint must not already be moving.
    pub fn request_move<B>(
        &mut self,
        arm: &Arm<B>,
        joint: usize,
        target: Angle,
        now_ms: u32,
    ) -> Result<(), ArmError> {
        arm.interlock().ensure_clear()?;
        let current = arm.joints().get(joint)?;
        arm.joints().check(joint, i32::from(target))?;
        if self.is_joint_active(joint) {
            return Err(ArmError::Busy);
        }
        self.start(joint, current, target, now_ms);
        Ok(())
    }

    /// Start moving every joint toward a pose
    ///
    /// All-or-nothing: the pose is rejected if any joint is moving or
    /// any angle is out of range.
    pub fn request_pose<B>(
        &mut self,
        arm: &Arm<B>,
        pose: &Pose,
        now_ms: u32,
    ) -> Result<(), ArmError> {
        arm.interlock().ensure_clear()?;
        arm.joints().check_pose(pose)?;
        if self.is_active() {
            return Err(ArmError::Busy);
        }
        let current = arm.joints().pose();
        for (joint, (&from, &to)) in current.iter().zip(pose.iter()).enumerate() {
            self.start(joint, from, to, now_ms);
        }
        Ok(())
    }

    fn start(&mut self, joint: usize, current: Angle, target: Angle, now_ms: u32) {
        if current == target {
            return;
        }
        self.motions[joint] = Some(MotionState {
            target,
            current,
            direction: StepDirection::between(current, target),
            last_step_ms: now_ms,
        });
    }

    /// Drop every in-flight motion
    ///
    /// Returns true if anything was moving.
    pub fn cancel_all(&mut self) -> bool {
        let was_active = self.is_active();
        self.motions = [None; JOINT_COUNT];
        was_active
    }

    /// Advance in-flight motions
    ///
    /// Every joint whose step interval has elapsed moves one degree.
    /// Returns `MotionComplete` when the last motion reaches its
    /// target, or `EmergencyStop` when the interlock cancels motion.
    pub fn tick<B: ServoBank>(&mut self, now_ms: u32, arm: &mut Arm<B>) -> Option<Event> {
        if !self.is_active() {
            return None;
        }
        if let Some(cause) = arm.interlock().cause() {
            self.cancel_all();
            return Some(Event::EmergencyStop(cause));
        }

        let interval = u32::from(self.step_interval_ms);
        let mut finished = false;
        for (joint, slot) in self.motions.iter_mut().enumerate() {
            let Some(motion) = slot.as_mut() else {
                continue;
            };
            if now_ms.wrapping_sub(motion.last_step_ms) < interval {
                continue;
            }
            let next = motion.current + motion.direction.delta();
            if arm.actuate(joint, next).is_err() {
                break;
            }
            motion.current = next;
            motion.last_step_ms = now_ms;
            if next == motion.target {
                *slot = None;
                finished = true;
            }
        }

        if let Some(cause) = arm.interlock().cause() {
            self.cancel_all();
            return Some(Event::EmergencyStop(cause));
        }
        if finished && !self.is_active() {
            Some(Event::MotionComplete)
        } else {
            None
        }
    }

    /// Move one joint to `target`, sleeping between steps
    ///
    /// Fallback for callers without a control loop. `stop_requested` and
    /// the interlock are polled before every step; either aborts the move
    /// with `EmergencyStop`, leaving the joint where it is.
    pub fn move_blocking<B, D, F>(
        &mut self,
        arm: &mut Arm<B>,
        joint: usize,
        target: Angle,
        delay: &mut D,
        mut stop_requested: F,
    ) -> Result<(), ArmError>
    where
        B: ServoBank,
        D: DelayNs,
        F: FnMut() -> bool,
    {
        arm.interlock().ensure_clear()?;
        let mut current = arm.joints().get(joint)?;
        arm.joints().check(joint, i32::from(target))?;
        if self.is_joint_active(joint) {
            return Err(ArmError::Busy);
        }

        let step = StepDirection::between(current, target).delta();
        while current != target {
            delay.delay_ms(u32::from(self.step_interval_ms));
            if stop_requested() {
                return Err(ArmError::EmergencyStop);
            }
            arm.interlock().ensure_clear()?;
            current += step;
            arm.actuate(joint, current)?;
        }
        Ok(())
    }
}

impl Default for MotionEngine {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_STEP_INTERVAL_MS)
    }
}
