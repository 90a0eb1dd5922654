//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod input;
pub mod servo;

pub use input::{InputError, NoInput, PoseInput};
pub use servo::{ServoBank, ServoDriver, ServoError};
