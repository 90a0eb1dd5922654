//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in armctl-core:
//!
//! - Hobby servos driven by a 50 Hz PWM channel

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod servo;

pub use servo::{PwmServo, ServoPulseConfig};
