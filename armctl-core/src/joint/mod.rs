//! Joint state and actuation
//!
//! The registry is the single source of truth for commanded joint
//! angles. `Arm` couples it with the servo bank and the safety
//! interlock so every servo write is mirrored in the registry.

pub mod arm;
pub mod registry;

pub use arm::Arm;
pub use registry::JointRegistry;

/// Number of joints on the arm
pub const JOINT_COUNT: usize = 6;

/// Joint angle in degrees
pub type Angle = i16;

/// One angle per joint
pub type Pose = [Angle; JOINT_COUNT];
