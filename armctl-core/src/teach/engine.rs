//! Teach engine
//!
//! While a session is active every sample maps each input reading onto
//! its joint's limits and writes the joints that moved further than the
//! deadband. Sessions exclude commanded motion and playback: one cannot
//! start while the other is active.

use crate::config::JointLimits;
use crate::joint::{Angle, Arm, Pose, JOINT_COUNT};
use crate::motion::MotionEngine;
use crate::sequence::PlaybackEngine;
use crate::state::{ArmError, Event};
use crate::traits::{PoseInput, ServoBank};

/// Time between input samples
pub const TEACH_SAMPLE_INTERVAL_MS: u32 = 20;

/// Changes this small are treated as input noise
pub const TEACH_DEADBAND: Angle = 1;

/// Map a raw reading onto a joint's limits, rounding to the nearest degree
///
/// Readings above `full_scale` count as full scale.
pub fn map_reading(raw: u16, full_scale: u16, limits: JointLimits) -> Angle {
    let span = i32::from(limits.max) - i32::from(limits.min);
    if full_scale == 0 || span <= 0 {
        return limits.min;
    }
    let full = i32::from(full_scale);
    let raw = i32::from(raw.min(full_scale));
    let offset = (raw * span + full / 2) / full;
    limits.min + offset as Angle
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct TeachState {
    last_sample_ms: u32,
}

/// Follows the position inputs while a teach session is active
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TeachEngine {
    state: Option<TeachState>,
}

impl TeachEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Start following the inputs
    ///
    /// The inputs are sampled once up front so a missing or failing input
    /// is reported here rather than on the first tick. The first tick
    /// after starting samples immediately.
    pub fn start<B, I: PoseInput>(
        &mut self,
        input: &mut I,
        motion: &MotionEngine,
        playback: &PlaybackEngine,
        arm: &Arm<B>,
        now_ms: u32,
    ) -> Result<(), ArmError> {
        arm.interlock().ensure_clear()?;
        if self.is_active() || motion.is_active() || playback.is_active() {
            return Err(ArmError::Busy);
        }
        input.read_all()?;
        self.state = Some(TeachState {
            last_sample_ms: now_ms.wrapping_sub(TEACH_SAMPLE_INTERVAL_MS),
        });
        Ok(())
    }

    /// End the session, leaving the joints where they are
    pub fn stop(&mut self) -> Result<(), ArmError> {
        self.state.take().map(|_| ()).ok_or(ArmError::NotTeaching)
    }

    /// Sample the inputs and move the arm to follow them
    ///
    /// Ends the session with `EmergencyStop` when the interlock is seen
    /// and with `TeachAborted` when the input fails.
    pub fn tick<B: ServoBank, I: PoseInput>(
        &mut self,
        now_ms: u32,
        input: &mut I,
        arm: &mut Arm<B>,
    ) -> Option<Event> {
        let state = self.state?;
        if let Some(cause) = arm.interlock().cause() {
            self.state = None;
            return Some(Event::EmergencyStop(cause));
        }
        if now_ms.wrapping_sub(state.last_sample_ms) < TEACH_SAMPLE_INTERVAL_MS {
            return None;
        }
        self.state = Some(TeachState {
            last_sample_ms: now_ms,
        });

        let Ok(pose) = taught_pose(input, arm) else {
            self.state = None;
            return Some(Event::TeachAborted);
        };
        let current = arm.joints().pose();
        for joint in 0..JOINT_COUNT {
            if (pose[joint] - current[joint]).abs() <= TEACH_DEADBAND {
                continue;
            }
            if arm.actuate(joint, pose[joint]).is_err() {
                self.state = None;
                return Some(match arm.interlock().cause() {
                    Some(cause) => Event::EmergencyStop(cause),
                    None => Event::TeachAborted,
                });
            }
        }
        None
    }
}

fn taught_pose<B, I: PoseInput>(input: &mut I, arm: &Arm<B>) -> Result<Pose, ArmError> {
    let readings = input.read_all()?;
    let full_scale = input.full_scale();
    let mut pose = [0; JOINT_COUNT];
    for (joint, angle) in pose.iter_mut().enumerate() {
        *angle = map_reading(readings[joint], full_scale, arm.joints().limits(joint)?);
    }
    Ok(pose)
}
