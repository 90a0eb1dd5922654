//! Joint motion
//!
//! Incremental, time-sliced stepping of joints toward their targets.

pub mod engine;

pub use engine::{MotionEngine, MotionState, StepDirection};
