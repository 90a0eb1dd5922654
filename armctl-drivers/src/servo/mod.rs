//! Servo driver implementations
//!
//! Positional hobby servos read the width of a pulse repeated every
//! 20 ms. The driver maps an angle linearly onto the pulse width and
//! the pulse width onto a duty cycle of the underlying PWM channel.

pub mod pwm;

pub use pwm::{PwmServo, ServoPulseConfig};
