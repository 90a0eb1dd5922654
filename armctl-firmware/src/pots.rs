//! Teach-mode potentiometers
//!
//! The RP2040 exposes only four ADC pins, so the six potentiometers
//! share ADC0 (GPIO 26) through an 8-channel analog multiplexer
//! (CD4051-style). Select lines S0-S2 are GPIO 13-15; pot N sits on
//! multiplexer input N-1.

use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::gpio::{Level, Output};
use embassy_time::{block_for, Duration};

use armctl_core::traits::{InputError, PoseInput};
use armctl_core::JOINT_COUNT;

/// 12-bit converter
pub const ADC_FULL_SCALE: u16 = 4095;

/// Multiplexer output settling time after switching inputs
const MUX_SETTLE_US: u64 = 10;

/// Six potentiometers behind one multiplexed ADC channel
pub struct PotMux {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
    select: [Output<'static>; 3],
}

impl PotMux {
    pub fn new(
        adc: Adc<'static, Blocking>,
        channel: Channel<'static>,
        select: [Output<'static>; 3],
    ) -> Self {
        Self {
            adc,
            channel,
            select,
        }
    }

    /// Drive the select lines for a joint's input and let it settle
    fn route(&mut self, joint: usize) {
        for (bit, line) in self.select.iter_mut().enumerate() {
            line.set_level(Level::from(joint & (1 << bit) != 0));
        }
        block_for(Duration::from_micros(MUX_SETTLE_US));
    }
}

impl PoseInput for PotMux {
    fn full_scale(&self) -> u16 {
        ADC_FULL_SCALE
    }

    fn read_raw(&mut self, joint: usize) -> Result<u16, InputError> {
        if joint >= JOINT_COUNT {
            return Err(InputError::Unavailable);
        }
        self.route(joint);
        self.adc
            .blocking_read(&mut self.channel)
            .map_err(|_| InputError::Read)
    }
}
