//! Safety interlock
//!
//! Cancels all in-flight motion and playback on demand.

pub mod interlock;

pub use interlock::{SafetyInterlock, StopCause};
