//! PWM servo driver
//!
//! Works with any `embedded_hal::pwm::SetDutyCycle` channel. The channel
//! must already run at the servo frame rate (50 Hz for `period_us`
//! 20000); the driver only changes the duty cycle.
//!
//! ```ignore
//! let mut servo = PwmServo::new(pwm_channel, ServoPulseConfig::default());
//! servo.set_angle(90)?; // 1.5 ms pulse
//! ```

use embedded_hal::pwm::SetDutyCycle;

use armctl_core::config::SERVO_MAX_ANGLE;
use armctl_core::traits::{ServoDriver, ServoError};
use armctl_core::Angle;

/// Pulse timing of a servo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoPulseConfig {
    /// Pulse width at 0 degrees (µs)
    pub min_pulse_us: u16,
    /// Pulse width at `max_angle` (µs)
    pub max_pulse_us: u16,
    /// PWM period (µs)
    pub period_us: u16,
    /// Angle reached at `max_pulse_us`
    pub max_angle: Angle,
}

impl Default for ServoPulseConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: 500,
            max_pulse_us: 2500,
            period_us: 20_000,
            max_angle: SERVO_MAX_ANGLE,
        }
    }
}

impl ServoPulseConfig {
    /// Pulse width for an angle, clamped to the configured range
    pub fn pulse_width_us(&self, angle: Angle) -> u16 {
        let angle = angle.clamp(0, self.max_angle.max(1)) as u32;
        let span = u32::from(self.max_pulse_us.saturating_sub(self.min_pulse_us));
        let max_angle = self.max_angle.max(1) as u32;
        self.min_pulse_us + (span * angle / max_angle) as u16
    }
}

/// Servo on a single PWM channel
pub struct PwmServo<P> {
    pwm: P,
    config: ServoPulseConfig,
}

impl<P: SetDutyCycle> PwmServo<P> {
    /// Wrap a PWM channel
    ///
    /// The servo output stays untouched until the first `set_angle`.
    pub fn new(pwm: P, config: ServoPulseConfig) -> Self {
        Self { pwm, config }
    }

    /// Duty cycle value for an angle on this channel
    pub fn duty_for(&self, angle: Angle) -> u16 {
        let pulse = u32::from(self.config.pulse_width_us(angle));
        let period = u32::from(self.config.period_us.max(1));
        let max_duty = u32::from(self.pwm.max_duty_cycle());
        (max_duty * pulse / period).min(max_duty) as u16
    }
}

impl<P: SetDutyCycle> ServoDriver for PwmServo<P> {
    fn set_angle(&mut self, angle: Angle) -> Result<(), ServoError> {
        if !(0..=self.config.max_angle).contains(&angle) {
            return Err(ServoError::InvalidAngle);
        }
        let duty = self.duty_for(angle);
        self.pwm
            .set_duty_cycle(duty)
            .map_err(|_| ServoError::Output)
    }
}
