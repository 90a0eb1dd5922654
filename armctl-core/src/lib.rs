//! Board-agnostic core logic for the arm controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Servo abstraction traits
//! - Joint registry and the `Arm` actuation context
//! - Non-blocking motion engine (one degree per step interval)
//! - Sequence store, playback engine and built-in choreographies
//! - Safety interlock
//! - Teach mode following operator position inputs
//! - Command dispatch (`Controller`)
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod joint;
pub mod motion;
pub mod safety;
pub mod sequence;
pub mod state;
pub mod teach;
pub mod traits;

#[cfg(test)]
mod testing;

pub use controller::{Controller, PollResult};
pub use joint::{Angle, Arm, JointRegistry, Pose, JOINT_COUNT};
pub use state::{ArmError, Event};
