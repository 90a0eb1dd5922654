//! Servo outputs
//!
//! Six hobby servos on the A channels of PWM slices 1-6
//! (GPIO 2, 4, 6, 8, 10, 12), base first, gripper last.

use embassy_rp::pwm::{Config as PwmConfig, PwmOutput};

use armctl_core::JOINT_COUNT;
use armctl_drivers::PwmServo;

/// 125 MHz system clock / 64 = 1.953125 MHz counter
const PWM_DIVIDER: u8 = 64;

/// Counter wraps after 39063 ticks: 50 Hz servo frame
pub const PWM_TOP: u16 = 39_062;

/// One servo channel
pub type Servo = PwmServo<PwmOutput<'static>>;

/// Servo bank handed to the controller
pub type ServoSet = [Servo; JOINT_COUNT];

/// Slice configuration for a 50 Hz servo frame, output held low
pub fn servo_pwm_config() -> PwmConfig {
    let mut config = PwmConfig::default();
    config.divider = PWM_DIVIDER.into();
    config.top = PWM_TOP;
    config.compare_a = 0;
    config
}
